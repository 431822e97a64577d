//! The engine's configuration surface.

use serde::Deserialize;
use serde::Serialize;

/// The options recognized at the core boundary.
///
/// `serde`-derived so a host application can load this from TOML/JSON
/// without the core itself depending on a file-format parser, keeping
/// config deserialization separate from the code that owns the actual
/// file reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When `true`, the Renamer runs before the Checker (spec 4.D).
    pub renaming_on: bool,
    /// When `true`, the per-language logging-elision relaxations are
    /// enabled in the Checker (spec 4.E).
    pub logging_on: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            renaming_on: false,
            logging_on: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_both_relaxations_off() {
        let config = EngineConfig::default();
        assert!(!config.renaming_on);
        assert!(!config.logging_on);
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig {
            renaming_on: true,
            logging_on: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
