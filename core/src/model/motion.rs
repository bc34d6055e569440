use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;

/// Kinematics of one object in a single frame, relative to ego.
///
/// `id` is the positional label assigned by normalization. It only names a
/// column group; the same id in another frame may be a different object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMotion {
    pub id: String,
    pub x_distance: f64,
    pub y_distance: f64,
    pub relative_speed: f64,
}

impl ObjectMotion {
    pub fn new(id: impl Into<String>, x_distance: f64, y_distance: f64, relative_speed: f64) -> Self {
        Self {
            id: id.into(),
            x_distance,
            y_distance,
            relative_speed,
        }
    }

    /// Builds the motion from raw velocity components.
    pub fn from_components(
        id: impl Into<String>,
        x_distance: f64,
        y_distance: f64,
        x_speed: f64,
        y_speed: f64,
    ) -> Self {
        Self::new(
            id,
            x_distance,
            y_distance,
            StatsHelper::planar_norm(x_speed, y_speed),
        )
    }

    pub fn range(&self) -> f64 {
        StatsHelper::planar_norm(self.x_distance, self.y_distance)
    }

    pub fn is_moving(&self) -> bool {
        self.relative_speed > 0.0
    }
}
