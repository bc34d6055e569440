use crate::model::ObjectMotion;

pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Time-to-collision at constant relative speed.
///
/// The denominator is floored at `epsilon`, so a stationary-relative object
/// yields a very large but finite TTC. Excluding such objects is up to the
/// caller.
#[derive(Debug, Clone, Copy)]
pub struct TtcEvaluator {
    epsilon: f64,
}

impl TtcEvaluator {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn ttc(&self, object: &ObjectMotion) -> f64 {
        object.range() / object.relative_speed.max(self.epsilon)
    }
}

impl Default for TtcEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttc_is_range_over_speed() {
        let object = ObjectMotion::new("1", 3.0, 4.0, 5.0);
        assert_eq!(TtcEvaluator::default().ttc(&object), 1.0);
    }

    #[test]
    fn ttc_floors_zero_speed() {
        let object = ObjectMotion::new("1", 3.0, 4.0, 0.0);
        let ttc = TtcEvaluator::default().ttc(&object);
        assert!(ttc.is_finite());
        assert!(ttc >= 5.0 / DEFAULT_EPSILON);
    }
}
