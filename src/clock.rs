//! Fixed-timestep accumulator driven by the frame clock

/// Converts variable frame times into a whole number of fixed ticks
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// `rate` ticks per second; at most `max_steps` ticks per frame
    pub fn new(rate: f32, max_steps: u32) -> Self {
        Self {
            step: 1.0 / rate,
            accumulator: 0.0,
            max_steps,
        }
    }

    /// Feed `elapsed` seconds, get the number of ticks to run now.
    /// Backlog beyond `max_steps` is dropped so a stall doesn't spiral.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_steps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_steps {
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedTimestep::new(60.0, 4);
        assert_eq!(clock.advance(0.010), 0);
        assert_eq!(clock.advance(0.010), 1);
        assert_eq!(clock.advance(1.0 / 30.0), 2);
    }

    #[test]
    fn test_drops_backlog_after_stall() {
        let mut clock = FixedTimestep::new(60.0, 4);
        assert_eq!(clock.advance(5.0), 4);
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_negative_time_ignored() {
        let mut clock = FixedTimestep::new(60.0, 4);
        assert_eq!(clock.advance(-1.0), 0);
    }
}
