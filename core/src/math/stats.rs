pub struct StatsHelper;

impl StatsHelper {
    /// Max minus min over the finite samples; zero when there are none.
    pub fn span<'a, I>(samples: I) -> f64
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let (min, max) = samples
            .into_iter()
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &value| {
                (lo.min(value), hi.max(value))
            });
        if min > max {
            return 0.0;
        }
        max - min
    }

    pub fn planar_norm(x: f64, y: f64) -> f64 {
        x.hypot(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::span(&[]), 0.0);
        assert_eq!(StatsHelper::span(&[f64::NAN]), 0.0);
    }

    #[test]
    fn span_skips_non_finite_samples() {
        assert_eq!(StatsHelper::span(&[2.0, f64::NAN, -3.0, 4.0]), 7.0);
    }

    #[test]
    fn planar_norm_matches_pythagoras() {
        assert_eq!(StatsHelper::planar_norm(3.0, 4.0), 5.0);
    }
}
