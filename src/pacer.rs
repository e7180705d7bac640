// pacer.rs
use std::time::{Duration, Instant};

/// Sleeps away whatever is left of a fixed frame budget.
pub struct FramePacer {
    budget: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            budget: Duration::from_secs(1) / target_fps.max(1),
            frame_start: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.budget.saturating_sub(elapsed)
    }

    /// Blocks until the current frame's budget is used up, then starts the
    /// next frame. Returns the length of the frame that just ended.
    pub fn wait(&mut self) -> Duration {
        let left = self.remaining(self.frame_start.elapsed());
        if !left.is_zero() {
            std::thread::sleep(left);
        }
        let now = Instant::now();
        let frame = now.duration_since(self.frame_start);
        self.frame_start = now;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_from_target_fps() {
        assert_eq!(FramePacer::new(50).budget(), Duration::from_millis(20));
        assert_eq!(FramePacer::new(0).budget(), Duration::from_secs(1));
    }

    #[test]
    fn remaining_saturates() {
        let pacer = FramePacer::new(50);
        assert_eq!(pacer.remaining(Duration::from_millis(5)), Duration::from_millis(15));
        assert_eq!(pacer.remaining(Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn wait_fills_the_budget() {
        let mut pacer = FramePacer::new(100);
        let frame = pacer.wait();
        assert!(frame >= Duration::from_millis(10));
    }
}
