use aebcore::prelude::{AnalysisConfig, TIMESTAMP, VEHICLE_SPEED, YAW_RATE};
use aebcore::SampleTable;
use anyhow::Context;
use clap::ValueEnum;
use rand::{rngs::StdRng, Rng, SeedableRng};

const RECORDER_PREFIXES: [&str; 8] = [
    "First", "Second", "Third", "Fourth", "Fifth", "Sixth", "Seventh", "Eighth",
];

/// Maneuver played out by the target object (object 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioProfile {
    /// Straight-line closing approach in ego's lane.
    HeadOn,
    /// Object crossing ego's path at a fixed longitudinal distance.
    Crossing,
    /// Closing approach while ego turns.
    Turning,
}

/// Configuration for generating a synthetic recording in raw recorder units.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub interval_s: f64,
    pub profile: ScenarioProfile,
    pub initial_distance_m: f64,
    pub closing_speed_mps: f64,
    pub ego_speed_mps: f64,
    /// Peak ego yaw angle reached in the turning profile, radians.
    pub turn_peak_rad: f64,
    /// Objects beyond the target; they recede or stand still.
    pub clutter_objects: usize,
    /// Positional jitter (meters) applied to clutter objects.
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            interval_s: 0.1,
            profile: ScenarioProfile::HeadOn,
            initial_distance_m: 60.0,
            closing_speed_mps: 5.0,
            ego_speed_mps: 15.0,
            turn_peak_rad: 0.6,
            clutter_objects: 2,
            noise: 0.05,
            seed: 0,
        }
    }
}

/// Planar state of one object in SI units.
#[derive(Debug, Clone, Copy)]
struct ObjectSample {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

fn recorder_prefix(index: usize) -> String {
    RECORDER_PREFIXES
        .get(index)
        .map(|prefix| prefix.to_string())
        .unwrap_or_else(|| format!("Extra{}", index + 1))
}

/// Header in the recorder's layout: all distance columns, then all speed columns.
fn recorder_header(objects: usize) -> Vec<String> {
    let mut header = vec![
        TIMESTAMP.to_string(),
        VEHICLE_SPEED.to_string(),
        YAW_RATE.to_string(),
    ];
    for group in ["ObjectDistance", "ObjectSpeed"] {
        for index in 0..objects {
            let prefix = recorder_prefix(index);
            header.push(format!("{}{}_X", prefix, group));
            header.push(format!("{}{}_Y", prefix, group));
        }
    }
    header
}

fn target_sample(config: &GeneratorConfig, t: f64, duration: f64) -> ObjectSample {
    let v = config.closing_speed_mps;
    match config.profile {
        ScenarioProfile::HeadOn | ScenarioProfile::Turning => ObjectSample {
            x: config.initial_distance_m - v * t,
            y: 0.0,
            vx: -v,
            vy: 0.0,
        },
        ScenarioProfile::Crossing => ObjectSample {
            x: config.initial_distance_m / 4.0,
            y: v * (duration / 2.0 - t),
            vx: 0.0,
            vy: -v,
        },
    }
}

fn clutter_sample(index: usize, t: f64, jitter: f64) -> ObjectSample {
    let receding = index % 2 == 0;
    let lateral = if receding { 3.5 } else { -3.5 };
    let vx = if receding { 1.0 } else { 0.0 };
    ObjectSample {
        x: 80.0 + 10.0 * index as f64 + vx * t + jitter,
        y: lateral,
        vx,
        vy: 0.0,
    }
}

/// Builds a raw-unit recording: distances ×128, speeds ×256, yaw in radians.
pub fn build_recording(config: &GeneratorConfig) -> anyhow::Result<SampleTable> {
    anyhow::ensure!(config.rows > 0, "generator needs at least one row");
    anyhow::ensure!(config.interval_s > 0.0, "generator interval must be positive");

    let scales = AnalysisConfig::default();
    let objects = 1 + config.clutter_objects;
    let duration = (config.rows - 1) as f64 * config.interval_s;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut rows = Vec::with_capacity(config.rows);
    for row_index in 0..config.rows {
        let t = row_index as f64 * config.interval_s;
        let yaw = match config.profile {
            ScenarioProfile::Turning if duration > 0.0 => config.turn_peak_rad * t / duration,
            _ => 0.0,
        };

        let mut samples = Vec::with_capacity(objects);
        samples.push(target_sample(config, t, duration));
        for index in 1..objects {
            let jitter = if config.noise > 0.0 {
                rng.gen_range(-config.noise..config.noise)
            } else {
                0.0
            };
            samples.push(clutter_sample(index, t, jitter));
        }

        let mut row = vec![t, config.ego_speed_mps * scales.speed_scale, yaw];
        row.extend(samples.iter().flat_map(|s| {
            [s.x * scales.distance_scale, s.y * scales.distance_scale]
        }));
        row.extend(
            samples
                .iter()
                .flat_map(|s| [s.vx * scales.speed_scale, s.vy * scales.speed_scale]),
        );
        rows.push(row);
    }

    SampleTable::new(recorder_header(objects), rows).context("assembling synthetic recording")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_shape() {
        let table = build_recording(&GeneratorConfig::default()).unwrap();
        assert_eq!(table.len(), 100);
        assert_eq!(table.column_names().len(), 3 + 4 * 3);
        assert_eq!(table.column_names()[3], "FirstObjectDistance_X");
        assert_eq!(table.column_names()[9], "FirstObjectSpeed_X");
    }

    #[test]
    fn generator_encodes_raw_units() {
        let table = build_recording(&GeneratorConfig::default()).unwrap();
        assert_eq!(table.value(0, "FirstObjectDistance_X"), Some(60.0 * 128.0));
        assert_eq!(table.value(0, "FirstObjectSpeed_X"), Some(-5.0 * 256.0));
        assert_eq!(table.value(0, "VehicleSpeed"), Some(15.0 * 256.0));
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            seed: 7,
            noise: 0.5,
            ..Default::default()
        };
        assert_eq!(
            build_recording(&config).unwrap(),
            build_recording(&config).unwrap()
        );
    }

    #[test]
    fn generator_rejects_empty_recording() {
        let config = GeneratorConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(build_recording(&config).is_err());
    }
}
