// geometry.rs
//
// Procedural meshes. Every generator validates its parameters and checks the
// full output size against the destination buffers before writing, so an
// error leaves the buffers exactly as they were.

use std::f32::consts::PI;
use glam::Vec3;
use rand::Rng;
use crate::{
    buffer::{FloatBuffer, IndexBuffer, TexturedVertexBuffer, VertexBuffer},
    config,
    error::GeometryError,
    vertex::{Color, TexturedVertex, Vertex},
};

/// Per-vertex coloring. Purely cosmetic: topology and positions never depend on it.
pub enum Shading<R> {
    Flat(Color),
    Random(R),
}

impl<R> Shading<R> {
    // `R` is never used for flat colors; callers without a generator pick any `Rng` type
    pub const fn flat(color: Color) -> Self {
        Shading::Flat(color)
    }
}

impl<R: Rng> Shading<R> {
    fn next_color(&mut self) -> Color {
        match self {
            Shading::Flat(color) => *color,
            Shading::Random(rng) => Color::new(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            ),
        }
    }
}

fn require(ok: bool, name: &'static str, reason: &'static str) -> Result<(), GeometryError> {
    if ok { Ok(()) } else { Err(GeometryError::InvalidParameter { name, reason }) }
}

// Product of element counts, or an overflow reported against `capacity`
fn element_count(factors: &[usize], capacity: usize) -> Result<usize, GeometryError> {
    factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .ok_or(GeometryError::CapacityExceeded { capacity, requested: usize::MAX })
}

/// First index of a batch of `vertex_count` vertices appended after `len`.
/// Fails when the batch's last index would not fit a `u32` index buffer.
fn index_base(len: usize, vertex_count: usize) -> Result<u32, GeometryError> {
    let last = len.checked_add(vertex_count.saturating_sub(1));
    match last.map(u32::try_from) {
        Some(Ok(_)) => Ok(len as u32),
        _ => Err(GeometryError::CapacityExceeded {
            capacity: u32::MAX as usize,
            requested: len.saturating_add(vertex_count),
        }),
    }
}

fn unit_sphere_point(phi: f32, theta: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Unit UV sphere: `stacks + 1` rings of `sectors` samples, pole to pole.
///
/// Each ring is stitched to the previous one with two triangles per sector.
/// The last sector of a ring wraps back to the ring's first vertex instead
/// of duplicating a seam column.
pub fn make_sphere<R: Rng>(
    vertices: &mut VertexBuffer,
    indices: &mut IndexBuffer,
    sectors: u32,
    stacks: u32,
    shading: &mut Shading<R>,
) -> Result<(), GeometryError> {
    require(sectors > 0, "sectors", "must be greater than zero")?;
    require(stacks > 0, "stacks", "must be greater than zero")?;
    let vertex_count = element_count(&[(stacks as usize).saturating_add(1), sectors as usize], vertices.capacity())?;
    vertices.reserve_for(vertex_count)?;
    let index_count = element_count(&[6, stacks as usize, sectors as usize], indices.capacity())?;
    indices.reserve_for(index_count)?;
    let base = index_base(vertices.len(), vertex_count)?;

    let delta_theta = (2.0 * PI) / sectors as f32;
    let delta_phi = PI / stacks as f32;

    for i in 0..=stacks {
        let phi = i as f32 * delta_phi;
        for j in 0..sectors {
            let theta = j as f32 * delta_theta;
            let color = shading.next_color();
            vertices.push_unchecked(Vertex::new(unit_sphere_point(phi, theta), color));
        }
    }

    for i in 1..=stacks {
        let prev = base + sectors * (i - 1);
        let cur = base + sectors * i;
        for j in 0..sectors {
            let next = if j == sectors - 1 { 0 } else { j + 1 };
            for index in [cur + j, prev + j, prev + next, cur + j, prev + next, cur + next] {
                indices.push_unchecked(index);
            }
        }
    }

    log::debug!("sphere: {} vertices, {} indices", vertex_count, index_count);
    Ok(())
}

/// Textured latitude/longitude patch covering a quarter of the unit sphere.
///
/// The grid is `stacks/2 + 1` rows by `sectors/2 + 1` columns. Texture
/// coordinates are linear in grid index (`s` across columns, `t` down rows
/// from 1 to 0), not in arc length.
pub fn make_earth<R: Rng>(
    vertices: &mut TexturedVertexBuffer,
    indices: &mut IndexBuffer,
    sectors: u32,
    stacks: u32,
    shading: &mut Shading<R>,
) -> Result<(), GeometryError> {
    require(sectors >= 2, "sectors", "must be at least 2")?;
    require(stacks >= 2, "stacks", "must be at least 2")?;
    let rows = stacks / 2;
    let cols = sectors / 2;
    let row_len = cols + 1;
    let vertex_count = element_count(&[(rows as usize).saturating_add(1), row_len as usize], vertices.capacity())?;
    vertices.reserve_for(vertex_count)?;
    let index_count = element_count(&[6, rows as usize, cols as usize], indices.capacity())?;
    indices.reserve_for(index_count)?;
    let base = index_base(vertices.len(), vertex_count)?;

    let delta_theta = (2.0 * PI) / sectors as f32;
    let delta_phi = PI / stacks as f32;
    let delta_s = 1.0 / cols as f32;
    let delta_t = 1.0 / rows as f32;

    for i in 0..=rows {
        let phi = PI / 2.0 - i as f32 * delta_phi;
        for j in 0..=cols {
            let theta = -PI + j as f32 * delta_theta;
            let color = shading.next_color();
            let s = j as f32 * delta_s;
            let t = 1.0 - i as f32 * delta_t;
            vertices.push_unchecked(TexturedVertex::new(unit_sphere_point(phi, theta), color, s, t));
        }
    }

    for i in 0..rows {
        for j in 0..cols {
            let a = base + i * row_len + j;
            let b = base + (i + 1) * row_len + j;
            for index in [a + 1, a, b, a + 1, b, b + 1] {
                indices.push_unchecked(index);
            }
        }
    }

    log::debug!("earth patch: {} vertices, {} indices", vertex_count, index_count);
    Ok(())
}

// Corners 0..4 are the front face (z = +0.5), 4..8 the back face.
//
//     3-----2        7-----6
//     |front|        |back |
//     0-----1        4-----5
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
];

// Counter-clockwise seen from outside
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // front
    1, 5, 6, 6, 2, 1, // right
    5, 4, 7, 7, 6, 5, // back
    4, 0, 3, 3, 7, 4, // left
    3, 2, 6, 6, 7, 3, // top
    4, 5, 1, 1, 0, 4, // bottom
];

fn push_cube_indices(indices: &mut IndexBuffer, base: u32) {
    for index in CUBE_INDICES {
        indices.push_unchecked(base + index);
    }
}

/// Unit cube as 8 shared corners: front corners blue, back corners red.
pub fn make_cube(vertices: &mut VertexBuffer, indices: &mut IndexBuffer) -> Result<(), GeometryError> {
    vertices.reserve_for(CUBE_CORNERS.len())?;
    indices.reserve_for(CUBE_INDICES.len())?;
    let base = index_base(vertices.len(), CUBE_CORNERS.len())?;

    for (i, corner) in CUBE_CORNERS.iter().enumerate() {
        let color = if i < 4 { Color::BLUE } else { Color::RED };
        vertices.push_unchecked(Vertex::new(Vec3::from_array(*corner), color));
    }
    push_cube_indices(indices, base);
    Ok(())
}

/// Same cube, positions only, as raw `x, y, z` floats.
pub fn make_cube_positions(floats: &mut FloatBuffer, indices: &mut IndexBuffer) -> Result<(), GeometryError> {
    floats.reserve_for(CUBE_CORNERS.len() * 3)?;
    indices.reserve_for(CUBE_INDICES.len())?;
    let base = index_base(floats.len() / 3, CUBE_CORNERS.len())?;

    for corner in CUBE_CORNERS {
        for component in corner {
            floats.push_unchecked(component);
        }
    }
    push_cube_indices(indices, base);
    Ok(())
}

/// Textured disc as a triangle fan, written as interleaved `x, y, s, t` floats.
///
/// Vertex 0 is the center; ring vertices `1..=segments` sit at
/// `CIRCLE_RADIUS`. The texture is mapped so the center samples (0.5, 0.5).
pub fn make_circle(floats: &mut FloatBuffer, indices: &mut IndexBuffer, segments: u32) -> Result<(), GeometryError> {
    require(segments > 0, "segments", "must be greater than zero")?;
    let vertex_count = (segments as usize).saturating_add(1);
    floats.reserve_for(element_count(&[vertex_count, config::CIRCLE_STRIDE], floats.capacity())?)?;
    indices.reserve_for(element_count(&[3, vertex_count], indices.capacity())?)?;
    let base = index_base(floats.len() / config::CIRCLE_STRIDE, vertex_count)?;

    for value in [0.0, 0.0, 0.5, 0.5] {
        floats.push_unchecked(value);
    }

    let delta_theta = (2.0 * PI) / segments as f32;
    for i in 0..segments {
        let (sin, cos) = (delta_theta * i as f32).sin_cos();
        let x = config::CIRCLE_RADIUS * cos;
        let y = config::CIRCLE_RADIUS * sin;
        let s = 0.5 - 0.5 * cos;
        let t = 0.5 - 0.5 * sin;
        for value in [x, y, s, t] {
            floats.push_unchecked(value);
        }

        let next = if i + 1 == segments { 1 } else { i + 2 };
        for index in [next, i + 1, 0] {
            indices.push_unchecked(base + index);
        }
    }

    // Closing triangle
    for index in [1, segments, 0] {
        indices.push_unchecked(base + index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn grey() -> Shading<StdRng> {
        Shading::flat(Color::GREY)
    }

    fn assert_triangle_list(indices: &IndexBuffer, vertex_count: usize) {
        assert_eq!(indices.len() % 3, 0);
        assert!(indices.as_slice().iter().all(|&i| (i as usize) < vertex_count));
    }

    #[test]
    fn sphere_vertex_count_and_unit_length() {
        for (sectors, stacks) in [(1, 1), (3, 2), (8, 5), (24, 16)] {
            let mut vb = VertexBuffer::new();
            let mut ib = IndexBuffer::new();
            make_sphere(&mut vb, &mut ib, sectors, stacks, &mut grey()).unwrap();

            assert_eq!(vb.len(), ((stacks + 1) * sectors) as usize);
            assert_eq!(ib.len(), (6 * stacks * sectors) as usize);
            for v in vb.as_slice() {
                assert_relative_eq!(Vec3::from_array(v.position).length(), 1.0, epsilon = 1e-5);
            }
            assert_triangle_list(&ib, vb.len());
        }
    }

    #[test]
    fn sphere_poles() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_sphere(&mut vb, &mut ib, 6, 4, &mut grey()).unwrap();
        assert_relative_eq!(vb[0].position[1], 1.0);
        assert_relative_eq!(vb[vb.len() - 1].position[1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn sphere_seam_wraps_to_ring_start() {
        let sectors = 4;
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_sphere(&mut vb, &mut ib, sectors, 3, &mut grey()).unwrap();

        // Last quad of the first band: j = 3 between ring 0 and ring 1
        let seam = &ib.as_slice()[18..24];
        assert_eq!(seam, &[7, 3, 0, 7, 0, 4]);
    }

    #[test]
    fn sphere_colors_reproducible_with_seed() {
        let build = |seed| {
            let mut vb = VertexBuffer::new();
            let mut ib = IndexBuffer::new();
            let mut shading = Shading::Random(StdRng::seed_from_u64(seed));
            make_sphere(&mut vb, &mut ib, 8, 4, &mut shading).unwrap();
            vb
        };
        let a = build(7);
        assert_eq!(a, build(7));
        assert!(a.as_slice().iter().flat_map(|v| v.color).all(|c| (0.0..1.0).contains(&c)));

        // Coloring never changes the geometry
        let b = build(8);
        for (va, vb) in a.as_slice().iter().zip(b.as_slice()) {
            assert_eq!(va.position, vb.position);
        }
    }

    #[test]
    fn sphere_rejects_zero_parameters() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        let mut shading = grey();
        assert!(matches!(
            make_sphere(&mut vb, &mut ib, 0, 4, &mut shading),
            Err(GeometryError::InvalidParameter { name: "sectors", .. })
        ));
        assert!(matches!(
            make_sphere(&mut vb, &mut ib, 4, 0, &mut shading),
            Err(GeometryError::InvalidParameter { name: "stacks", .. })
        ));
    }

    #[test]
    fn sphere_overflow_leaves_buffers_untouched() {
        let mut vb = VertexBuffer::with_capacity(10);
        let mut ib = IndexBuffer::new();
        let err = make_sphere(&mut vb, &mut ib, 4, 4, &mut grey()).unwrap_err();
        assert_eq!(err, GeometryError::CapacityExceeded { capacity: 10, requested: 20 });
        assert!(vb.is_empty());
        assert!(ib.is_empty());
    }

    #[test]
    fn flat_shading_with_any_rng_type() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        let mut shading = Shading::<rand::rngs::ThreadRng>::flat(Color::RED);
        make_sphere(&mut vb, &mut ib, 5, 3, &mut shading).unwrap();
        assert!(vb.as_slice().iter().all(|v| v.color == Color::RED.to_array()));
    }

    #[test]
    fn huge_parameters_report_capacity_instead_of_overflowing() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        let err = make_sphere(&mut vb, &mut ib, u32::MAX, u32::MAX, &mut grey()).unwrap_err();
        assert!(matches!(err, GeometryError::CapacityExceeded { .. }));
        assert!(vb.is_empty() && ib.is_empty());

        let mut tvb = TexturedVertexBuffer::new();
        let err = make_earth(&mut tvb, &mut ib, u32::MAX, u32::MAX, &mut grey()).unwrap_err();
        assert!(matches!(err, GeometryError::CapacityExceeded { .. }));
        assert!(tvb.is_empty() && ib.is_empty());

        let mut floats = FloatBuffer::new();
        let err = make_circle(&mut floats, &mut ib, u32::MAX).unwrap_err();
        assert!(matches!(err, GeometryError::CapacityExceeded { .. }));
        assert!(floats.is_empty() && ib.is_empty());
    }

    #[test]
    fn element_count_overflow_is_an_error() {
        assert_eq!(element_count(&[6, 4, 5], 10), Ok(120));
        assert_eq!(
            element_count(&[6, usize::MAX], 10),
            Err(GeometryError::CapacityExceeded { capacity: 10, requested: usize::MAX })
        );
    }

    #[test]
    fn index_base_stays_within_u32() {
        let max = u32::MAX as usize;
        assert_eq!(index_base(0, 8), Ok(0));
        assert_eq!(index_base(max, 1), Ok(u32::MAX));
        assert!(index_base(max, 2).is_err());
        assert!(index_base(usize::MAX, 2).is_err());
    }

    #[test]
    fn earth_grid_and_texture_coordinates() {
        let mut vb = TexturedVertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_earth(&mut vb, &mut ib, 32, 32, &mut grey()).unwrap();

        assert_eq!(vb.len(), 17 * 17);
        assert_eq!(ib.len(), 6 * 16 * 16);
        assert_triangle_list(&ib, vb.len());

        assert_eq!(vb[0].tex_coords, [0.0, 1.0]);
        let last = vb[vb.len() - 1].tex_coords;
        assert_relative_eq!(last[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(last[1], 0.0, epsilon = 1e-6);

        // First row sits on the equator at theta = -PI
        let first = Vec3::from_array(vb[0].position);
        assert_relative_eq!(first.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(first.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn earth_first_cell_winding() {
        let mut vb = TexturedVertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_earth(&mut vb, &mut ib, 4, 4, &mut grey()).unwrap();
        // 3 columns per row
        assert_eq!(&ib.as_slice()[..6], &[1, 0, 3, 1, 3, 4]);
    }

    #[test]
    fn earth_rejects_too_few_divisions() {
        let mut vb = TexturedVertexBuffer::new();
        let mut ib = IndexBuffer::new();
        assert!(make_earth(&mut vb, &mut ib, 1, 8, &mut grey()).is_err());
        assert!(vb.is_empty());
    }

    #[test]
    fn cube_counts_and_colors() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_cube(&mut vb, &mut ib).unwrap();

        assert_eq!(vb.len(), 8);
        assert_eq!(ib.len(), 36);
        assert_triangle_list(&ib, 8);
        assert!(vb.as_slice()[..4].iter().all(|v| v.color == Color::BLUE.to_array()));
        assert!(vb.as_slice()[4..].iter().all(|v| v.color == Color::RED.to_array()));
    }

    #[test]
    fn cube_faces_point_outward() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_cube(&mut vb, &mut ib).unwrap();

        for tri in ib.as_slice().chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(vb[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle {:?}", tri);
        }
    }

    #[test]
    fn cube_positions_match_vertex_cube() {
        let mut floats = FloatBuffer::new();
        let mut ib = IndexBuffer::new();
        make_cube_positions(&mut floats, &mut ib).unwrap();

        assert_eq!(floats.len(), 24);
        assert_eq!(ib.as_slice(), &CUBE_INDICES);
        assert_eq!(&floats.as_slice()[3..6], &[0.5, -0.5, 0.5]);
    }

    #[test]
    fn cube_appends_after_existing_geometry() {
        let mut vb = VertexBuffer::new();
        let mut ib = IndexBuffer::new();
        make_cube(&mut vb, &mut ib).unwrap();
        make_cube(&mut vb, &mut ib).unwrap();
        assert_eq!(vb.len(), 16);
        assert_eq!(ib[36], 8);
        assert_triangle_list(&ib, 16);
    }

    #[test]
    fn circle_four_segments() {
        let mut floats = FloatBuffer::new();
        let mut ib = IndexBuffer::new();
        make_circle(&mut floats, &mut ib, 4).unwrap();

        assert_eq!(floats.len(), 5 * config::CIRCLE_STRIDE);
        assert_eq!(&floats.as_slice()[..4], &[0.0, 0.0, 0.5, 0.5]);

        let v1 = &floats.as_slice()[4..8];
        assert_relative_eq!(v1[0], 0.3);
        assert_relative_eq!(v1[1], 0.0);
        assert_relative_eq!(v1[2], 0.0);
        assert_relative_eq!(v1[3], 0.5);

        assert_eq!(ib.len(), 15);
        assert_eq!(&ib.as_slice()[..3], &[2, 1, 0]);
        assert_eq!(&ib.as_slice()[12..], &[1, 4, 0]);
        assert_triangle_list(&ib, 5);
    }

    #[test]
    fn circle_counts() {
        for segments in [1, 3, 36, 100] {
            let mut floats = FloatBuffer::new();
            let mut ib = IndexBuffer::new();
            make_circle(&mut floats, &mut ib, segments).unwrap();
            assert_eq!(floats.len() / config::CIRCLE_STRIDE, segments as usize + 1);
            assert_eq!(ib.len(), 3 * (segments as usize + 1));
            assert_triangle_list(&ib, segments as usize + 1);
        }
    }

    #[test]
    fn circle_rejects_zero_segments() {
        let mut floats = FloatBuffer::new();
        let mut ib = IndexBuffer::new();
        assert!(make_circle(&mut floats, &mut ib, 0).is_err());
    }
}
