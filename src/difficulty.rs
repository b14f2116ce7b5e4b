use serde::{Deserialize, Serialize};

use crate::{BASE_TIME, LEVELS_PER_STEP, MIN_TIME, TIME_STEP};

/// How much countdown a round gets as the level climbs.
///
/// The default curve starts every round at 20 ticks and takes 2 ticks away
/// for each full group of 5 levels reached, never going below 2.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DifficultyCurve {
    pub base_time: u32,
    pub step: u32,
    pub levels_per_step: u32,
    pub floor: u32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            base_time: BASE_TIME,
            step: TIME_STEP,
            levels_per_step: LEVELS_PER_STEP,
            floor: MIN_TIME,
        }
    }
}

impl DifficultyCurve {
    /// Ticks allotted to a round played at `level`.
    pub fn initial_time(&self, level: u32) -> u32 {
        if self.levels_per_step == 0 {
            return self.base_time.max(self.floor);
        }
        let reduction = (level / self.levels_per_step).saturating_mul(self.step);
        self.base_time.saturating_sub(reduction).max(self.floor)
    }
}

/// Allotted time on the default curve.
pub fn initial_time(level: u32) -> u32 {
    DifficultyCurve::default().initial_time(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_levels_get_full_time() {
        for level in 1..=4 {
            assert_eq!(initial_time(level), 20, "level {level}");
        }
    }

    #[test]
    fn each_group_of_five_levels_costs_two_ticks() {
        for level in 5..=9 {
            assert_eq!(initial_time(level), 18, "level {level}");
        }
        assert_eq!(initial_time(10), 16);
        assert_eq!(initial_time(25), 10);
    }

    #[test]
    fn time_is_floored() {
        assert_eq!(initial_time(90), 2);
        assert_eq!(initial_time(95), 2);
        assert_eq!(initial_time(1000), 2);
        assert_eq!(initial_time(u32::MAX), 2);
    }

    #[test]
    fn time_never_increases_and_never_drops_below_floor() {
        let mut previous = initial_time(1);
        for level in 1..=2_000 {
            let time = initial_time(level);
            assert!(time >= 2, "level {level} got {time}");
            assert!(time <= previous, "level {level} went from {previous} to {time}");
            previous = time;
        }
    }

    #[test]
    fn custom_curve() {
        let curve = DifficultyCurve {
            base_time: 30,
            step: 5,
            levels_per_step: 3,
            floor: 10,
        };
        assert_eq!(curve.initial_time(1), 30);
        assert_eq!(curve.initial_time(3), 25);
        assert_eq!(curve.initial_time(6), 20);
        assert_eq!(curve.initial_time(100), 10);
    }

    #[test]
    fn zero_levels_per_step_disables_scaling() {
        let curve = DifficultyCurve {
            levels_per_step: 0,
            ..DifficultyCurve::default()
        };
        assert_eq!(curve.initial_time(1), 20);
        assert_eq!(curve.initial_time(500), 20);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let curve: DifficultyCurve = serde_json::from_str(r#"{ "floor": 5 }"#).unwrap();
        assert_eq!(curve.base_time, 20);
        assert_eq!(curve.floor, 5);
        assert_eq!(curve.initial_time(1000), 5);
    }
}
