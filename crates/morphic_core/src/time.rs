use std::time::Duration;

#[derive(Default)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
}

impl Time {
    /// Advances by a fixed step (headless runs, tests).
    pub fn tick(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
    }

    /// Returns time in seconds since last frame (e.g., 0.016 for 60fps)
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns total time advanced since startup
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_accumulates_fixed_steps() {
        let mut time = Time::default();
        for _ in 0..4 {
            time.tick(Duration::from_millis(250));
        }
        assert_eq!(time.delta_seconds(), 0.25);
        assert_eq!(time.elapsed_seconds(), 1.0);
    }
}
