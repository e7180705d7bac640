// scene.rs
//
// CPU side of the scene: the meshes built once at startup and the per-frame
// transform sequence for each object.

use glam::{Vec2, Vec3};
use rand::{rngs::StdRng, Rng};
use crate::{
    buffer::{FloatBuffer, IndexBuffer, TexturedVertexBuffer, VertexBuffer},
    config,
    error::{GeometryError, TransformError},
    geometry::{self, Shading},
    transform::{self, TransformList},
    vertex::Color,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy)]
pub struct Spin {
    pub axis: Axis,
    pub clockwise: bool,
    pub rate: f32, // radians per second
}

impl Spin {
    fn push(&self, list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
        match (self.axis, self.clockwise) {
            (Axis::X, true) => transform::rotate_cw_x(list, angle),
            (Axis::X, false) => transform::rotate_ccw_x(list, angle),
            (Axis::Y, true) => transform::rotate_cw_y(list, angle),
            (Axis::Y, false) => transform::rotate_ccw_y(list, angle),
            (Axis::Z, true) => transform::rotate_cw_z(list, angle),
            (Axis::Z, false) => transform::rotate_ccw_z(list, angle),
        }
    }
}

/// Where an object sits and how it moves.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub scale: Vec3,
    pub spin: Option<Spin>,
    pub offset: Vec3,
}

impl Placement {
    /// Rebuilds `list` for this frame: scale, spin, move into place, then the
    /// drag orbit (yaw about Y, pitch about X) shared by the whole scene.
    pub fn write_transforms(&self, list: &mut TransformList, time: f32, orbit: Vec2) -> Result<(), TransformError> {
        list.clear();
        transform::scale(list, self.scale.x, self.scale.y, self.scale.z)?;
        if let Some(spin) = &self.spin {
            spin.push(list, spin.rate * time)?;
        }
        transform::translate(list, self.offset.x, self.offset.y, self.offset.z)?;
        transform::rotate_cw_y(list, orbit.x)?;
        transform::rotate_cw_x(list, orbit.y)?;
        Ok(())
    }
}

pub struct ColoredMesh {
    pub vertices: VertexBuffer,
    pub indices: IndexBuffer,
}

pub struct TexturedMesh {
    pub vertices: TexturedVertexBuffer,
    pub indices: IndexBuffer,
}

pub struct FloatMesh {
    pub floats: FloatBuffer,
    pub indices: IndexBuffer,
}

pub struct SceneMeshes {
    pub sphere: ColoredMesh,
    pub cube: ColoredMesh,
    pub earth: TexturedMesh,
    pub circle: FloatMesh,
}

impl SceneMeshes {
    /// Builds every mesh. `rng` only colors the sphere's vertices.
    pub fn build<R: Rng>(rng: R) -> Result<Self, GeometryError> {
        let mut sphere = ColoredMesh { vertices: VertexBuffer::new(), indices: IndexBuffer::new() };
        geometry::make_sphere(
            &mut sphere.vertices, &mut sphere.indices,
            config::SPHERE_SECTORS, config::SPHERE_STACKS,
            &mut Shading::Random(rng),
        )?;

        let mut cube = ColoredMesh { vertices: VertexBuffer::with_capacity(8), indices: IndexBuffer::with_capacity(36) };
        geometry::make_cube(&mut cube.vertices, &mut cube.indices)?;

        let mut earth = TexturedMesh { vertices: TexturedVertexBuffer::new(), indices: IndexBuffer::new() };
        geometry::make_earth(
            &mut earth.vertices, &mut earth.indices,
            config::EARTH_SECTORS, config::EARTH_STACKS,
            &mut Shading::<StdRng>::flat(Color::new(1.0, 1.0, 1.0)),
        )?;

        let mut circle = FloatMesh { floats: FloatBuffer::new(), indices: IndexBuffer::new() };
        geometry::make_circle(&mut circle.floats, &mut circle.indices, config::CIRCLE_SEGMENTS)?;

        log::info!(
            "Built meshes: sphere {}v, cube {}v, earth {}v, circle {}v",
            sphere.vertices.len(), cube.vertices.len(), earth.vertices.len(),
            circle.floats.len() / config::CIRCLE_STRIDE,
        );
        Ok(Self { sphere, cube, earth, circle })
    }
}

pub fn sphere_placement() -> Placement {
    Placement {
        scale: Vec3::splat(0.6),
        spin: Some(Spin { axis: Axis::Y, clockwise: true, rate: config::SPIN_SPEED }),
        offset: Vec3::new(-1.5, 0.0, 0.0),
    }
}

pub fn cube_placement() -> Placement {
    Placement {
        scale: Vec3::splat(0.8),
        spin: Some(Spin { axis: Axis::X, clockwise: false, rate: config::SPIN_SPEED }),
        offset: Vec3::new(1.5, 0.0, 0.0),
    }
}

pub fn earth_placement() -> Placement {
    Placement {
        scale: Vec3::splat(0.8),
        spin: Some(Spin { axis: Axis::Y, clockwise: false, rate: config::SPIN_SPEED * 0.5 }),
        offset: Vec3::new(0.0, 1.2, 0.0),
    }
}

pub fn circle_placement() -> Placement {
    Placement {
        scale: Vec3::new(1.5, 1.5, 1.0),
        spin: Some(Spin { axis: Axis::Z, clockwise: true, rate: config::SPIN_SPEED }),
        offset: Vec3::new(0.0, -1.2, 0.0),
    }
}
