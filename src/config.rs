//! Configuration loaded from a TOML file.
//!
//! Every section and field is optional; anything left out falls back to the
//! values the robot was tuned with on the field.

use crate::error::{Error, Result};
use crate::gps::GeoLocation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub robot: RobotConfig,
    pub field: FieldConfig,
    pub serial: SerialConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RobotConfig {
    /// How often the loop (and dead reckoning) runs
    pub loop_interval_ms: u64,
    /// Both wheels must be commanded above this to count as moving forward
    pub forward_threshold: u32,
    /// Assumed ground speed while moving forward, feet per second
    pub default_speed_ft_per_sec: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: 100,
            forward_threshold: 30,
            default_speed_ft_per_sec: 3.3,
        }
    }
}

impl RobotConfig {
    /// Longest loop interval accepted from a config file
    pub const MAX_LOOP_INTERVAL_MS: u64 = 10_000;

    pub fn loop_interval(&self) -> Duration {
        Duration::from_millis(self.loop_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Red,
    Blue,
}

/// Where the two home bases are. Used by layers above the robot base to
/// turn GPS readings into field coordinates and pick targets.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Team the robot starts on; can be switched at runtime by the layer above
    pub team: Team,
    /// Middle of the red end zone
    pub red_home: GeoLocation,
    /// Middle of the blue end zone
    pub blue_home: GeoLocation,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            team: Team::Red,
            red_home: GeoLocation {
                latitude: 39.485297,
                longitude: -87.325922,
            },
            blue_home: GeoLocation {
                latitude: 39.485549,
                longitude: -87.324796,
            },
        }
    }
}

impl FieldConfig {
    pub fn home(&self) -> GeoLocation {
        match self.team {
            Team::Red => self.red_home,
            Team::Blue => self.blue_home,
        }
    }
    pub fn away(&self) -> GeoLocation {
        match self.team {
            Team::Red => self.blue_home,
            Team::Blue => self.red_home,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SerialConfig {
    /// Accessory link to the wheel microcontroller (e.g. "/dev/ttyACM0")
    pub port: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default env_logger filter, overridden by RUST_LOG
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let interval = self.robot.loop_interval_ms;
        if interval == 0 || interval > RobotConfig::MAX_LOOP_INTERVAL_MS {
            return Err(Error::InvalidConfig(format!(
                "robot.loop_interval_ms must be in 1..={}, got {interval}",
                RobotConfig::MAX_LOOP_INTERVAL_MS
            )));
        }
        let speed = self.robot.default_speed_ft_per_sec;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "robot.default_speed_ft_per_sec must be finite and positive, got {speed}"
            )));
        }
        Ok(())
    }

    /// Start env_logger with the configured level unless RUST_LOG says otherwise.
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.logging.level.as_str());
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_field_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.robot.loop_interval(), Duration::from_millis(100));
        assert_eq!(config.robot.forward_threshold, 30);
        assert_eq!(config.robot.default_speed_ft_per_sec, 3.3);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [robot]
            default_speed_ft_per_sec = 2.5

            [serial]
            port = "/dev/ttyUSB1"
            "#,
        )
        .unwrap();
        assert_eq!(config.robot.default_speed_ft_per_sec, 2.5);
        assert_eq!(config.robot.loop_interval_ms, 100);
        assert_eq!(config.serial.port, "/dev/ttyUSB1");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_zero_interval() {
        let err = Config::from_toml("[robot]\nloop_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_huge_interval() {
        let err = Config::from_toml("[robot]\nloop_interval_ms = 9223372036854775807\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(Config::from_toml("[robot]\nloop_interval_ms = 10000\n").is_ok());
        assert!(Config::from_toml("[robot]\nloop_interval_ms = 10001\n").is_err());
    }

    #[test]
    fn rejects_non_positive_speed() {
        let err = Config::from_toml("[robot]\ndefault_speed_ft_per_sec = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_infinite_or_nan_speed() {
        for speed in ["inf", "-inf", "nan"] {
            let toml = format!("[robot]\ndefault_speed_ft_per_sec = {speed}\n");
            let err = Config::from_toml(&toml).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{speed} accepted");
        }
    }

    #[test]
    fn field_defaults_start_on_red() {
        let field = Config::from_toml("").unwrap().field;
        assert_eq!(field.team, Team::Red);
        assert_eq!(field.home().latitude, 39.485297);
        assert_eq!(field.home().longitude, -87.325922);
        assert_eq!(field.away().latitude, 39.485549);
        assert_eq!(field.away().longitude, -87.324796);
    }

    #[test]
    fn blue_team_swaps_home_and_away() {
        let field = Config::from_toml(
            r#"
            [field]
            team = "blue"

            [field.red_home]
            latitude = 1.0
            longitude = 2.0
            "#,
        )
        .unwrap()
        .field;
        assert_eq!(field.away().latitude, 1.0);
        assert_eq!(field.home().latitude, 39.485549);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml("[robot\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
