//! Checker configuration.
//!
//! ```yaml
//! name: collision_checker
//! global_frame: map
//! robot_base_frame: base_link
//! transform_tolerance: 0.1
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::collision::PoseBuffer;
use crate::types::MapError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerConfig {
    /// Name carried in every error raised by the checker.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_global_frame")]
    pub global_frame: String,
    #[serde(default = "default_robot_base_frame")]
    pub robot_base_frame: String,
    /// Maximum age of the robot pose transform. Given in seconds.
    #[serde(
        default = "default_transform_tolerance",
        deserialize_with = "deserialize_tolerance"
    )]
    pub transform_tolerance: Duration,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            global_frame: default_global_frame(),
            robot_base_frame: default_robot_base_frame(),
            transform_tolerance: default_transform_tolerance(),
        }
    }
}

impl CheckerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MapError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Pose buffer for the configured frames and tolerance.
    pub fn pose_buffer(&self) -> PoseBuffer {
        PoseBuffer::new(
            self.global_frame.clone(),
            self.robot_base_frame.clone(),
            self.transform_tolerance,
        )
    }
}

fn default_name() -> String {
    "collision_checker".to_string()
}

fn default_global_frame() -> String {
    "map".to_string()
}

fn default_robot_base_frame() -> String {
    "base_link".to_string()
}

fn default_transform_tolerance() -> Duration {
    Duration::from_millis(100)
}

fn deserialize_tolerance<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(value).map_err(|_| {
        serde::de::Error::custom(format!(
            "transform_tolerance must be a non-negative number of seconds, got {value}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = CheckerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CheckerConfig::default());
        assert_eq!(config.global_frame, "map");
        assert_eq!(config.robot_base_frame, "base_link");
        assert_eq!(config.transform_tolerance, Duration::from_millis(100));
    }

    #[test]
    fn overrides_are_read() {
        let config = CheckerConfig::from_yaml_str(
            "name: footprint_critic\nglobal_frame: odom\ntransform_tolerance: 0.5\n",
        )
        .unwrap();
        assert_eq!(config.name, "footprint_critic");
        assert_eq!(config.global_frame, "odom");
        assert_eq!(config.robot_base_frame, "base_link");
        assert_eq!(config.transform_tolerance, Duration::from_millis(500));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = CheckerConfig::from_yaml_str("transform_tolerance: -1.0").unwrap_err();
        assert!(matches!(err, MapError::Yaml(_)));
    }

    #[test]
    fn tolerance_beyond_duration_range_is_rejected() {
        let err = CheckerConfig::from_yaml_str("transform_tolerance: 1.0e30").unwrap_err();
        assert!(matches!(err, MapError::Yaml(_)));
        assert!(CheckerConfig::from_yaml_str("transform_tolerance: .nan").is_err());
        assert!(CheckerConfig::from_yaml_str("transform_tolerance: .inf").is_err());
    }

    #[test]
    fn large_valid_tolerance_builds_pose_buffer() {
        let config = CheckerConfig::from_yaml_str("transform_tolerance: 1.0e9").unwrap();
        assert_eq!(config.transform_tolerance, Duration::from_secs(1_000_000_000));
        let _buffer = config.pose_buffer();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(CheckerConfig::from_yaml_str("robot_frame: base_link").is_err());
    }
}
