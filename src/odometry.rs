use std::time::Duration;

use crate::vec::Vec2;

/// Constant-velocity dead reckoning along the current heading.
///
/// Runs once per loop interval and only while the robot is driving forward.
/// The guess is thrown away whenever a GPS fix arrives, so the error here
/// never builds up past one fix interval.
#[derive(Debug, Clone, Copy)]
pub struct DeadReckoning {
    speed_ft_per_sec: f64,
    interval: Duration,
}

impl DeadReckoning {
    pub fn new(speed_ft_per_sec: f64, interval: Duration) -> Self {
        Self {
            speed_ft_per_sec,
            interval,
        }
    }

    /// Feet travelled in one interval at the assumed speed.
    pub fn step_distance(&self) -> f64 {
        self.speed_ft_per_sec * self.interval.as_secs_f64()
    }

    /// Advance `guess` by one interval along `heading` (degrees).
    pub fn advance(&self, guess: &mut Vec2, heading: f64) {
        *guess += Vec2::from_heading_degrees(heading) * self.step_distance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn one_step_is_speed_times_interval() {
        let dr = DeadReckoning::new(3.3, Duration::from_millis(100));
        assert_relative_eq!(dr.step_distance(), 0.33, epsilon = 1e-12);
    }

    #[test]
    fn advance_projects_along_heading() {
        let dr = DeadReckoning::new(3.3, Duration::from_millis(100));
        for heading in [-170.0, -90.0, -12.5, 0.0, 45.0, 90.0, 179.0] {
            let start = Vec2::new(10.0, -4.0);
            let mut guess = start;
            dr.advance(&mut guess, heading);
            let rad = f64::to_radians(heading);
            assert_relative_eq!(guess.x, start.x + 0.33 * rad.cos(), epsilon = 1e-9);
            assert_relative_eq!(guess.y, start.y + 0.33 * rad.sin(), epsilon = 1e-9);
        }
    }

    #[test]
    fn ten_steps_cover_one_second() {
        let dr = DeadReckoning::new(2.0, Duration::from_millis(100));
        let mut guess = Vec2::ZERO;
        for _ in 0..10 {
            dr.advance(&mut guess, 0.0);
        }
        assert_relative_eq!(guess.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(guess.y, 0.0, epsilon = 1e-9);
    }
}
