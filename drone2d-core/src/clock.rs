use tracing::debug;

/// Turns variable frame times into whole fixed-size simulation steps.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step_seconds: f32,
    max_steps_per_frame: u32,
    accumulator: f32,
    total_seconds: f64,
    ticks: u64,
}

impl FixedStepClock {
    pub fn new(step_seconds: f32, max_steps_per_frame: u32) -> Self {
        Self {
            step_seconds,
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
            total_seconds: 0.0,
            ticks: 0,
        }
    }

    /// Adds one frame's elapsed time and returns how many fixed steps to run.
    /// Backlog beyond `max_steps_per_frame` is dropped.
    pub fn advance(&mut self, frame_seconds: f32) -> u32 {
        if frame_seconds.is_finite() && frame_seconds > 0.0 {
            self.accumulator += frame_seconds;
        }

        let mut steps = 0;
        while self.accumulator >= self.step_seconds && steps < self.max_steps_per_frame {
            self.accumulator -= self.step_seconds;
            steps += 1;
        }

        if self.accumulator >= self.step_seconds {
            debug!(
                dropped_seconds = self.accumulator,
                "frame too slow, dropping simulation backlog"
            );
            self.accumulator %= self.step_seconds;
        }

        self.ticks += u64::from(steps);
        self.total_seconds += f64::from(steps) * f64::from(self.step_seconds);
        steps
    }

    pub fn step_seconds(&self) -> f32 {
        self.step_seconds
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = FixedStepClock::new(0.25, 8);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 1);
        assert_eq!(clock.advance(0.5), 2);
        assert_eq!(clock.ticks(), 3);
        assert_relative_eq!(clock.total_seconds(), 0.75);
    }

    #[test]
    fn caps_steps_and_drops_backlog() {
        let mut clock = FixedStepClock::new(0.25, 2);
        assert_eq!(clock.advance(10.0), 2);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn ignores_invalid_frame_times() {
        let mut clock = FixedStepClock::new(0.25, 4);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
        assert_eq!(clock.total_seconds(), 0.0);
    }
}
