//! TOML file configuration structures.
//!
//! These structs directly map to the `adserve-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use time::UtcOffset;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    ([0, 0, 0, 0], 8080).into()
}

/// Pacing configuration section.
///
/// Budget pacing and the daily reset both work in "local" time; which time
/// zone counts as local is an explicit deployment choice because it shifts
/// allocation behavior around midnight. Defaults to UTC.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Whole-hour UTC offset defining the pacing day, e.g. `-5` or `2`.
    #[serde(default)]
    pub utc_offset_hours: i8,
}

impl PacingConfig {
    /// The pacing offset; falls back to UTC if the configured hour count is
    /// outside the valid range.
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[pacing]
utc_offset_hours = -5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.pacing.utc_offset_hours, -5);
        assert_eq!(config.pacing.utc_offset().whole_hours(), -5);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.pacing.utc_offset(), UtcOffset::UTC);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = PacingConfig {
            utc_offset_hours: 30,
        };
        assert_eq!(config.utc_offset(), UtcOffset::UTC);
    }
}
