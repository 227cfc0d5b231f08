use std::fs::File;
use std::net::{IpAddr, Ipv4Addr};

use serde::Deserialize;

use super::folders::CONFIG_DIR;
use super::tracking::unified::GazeRange;

const FILE_NAME: &str = "facebridge.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub bind_addr: IpAddr,
    /// Port the remote application announces itself on (avatar changes).
    pub in_port: u16,
    /// Port the remote application listens for parameters on.
    pub out_port: u16,
    pub gaze_range: GazeRange,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            in_port: 9001,
            out_port: 9000,
            gaze_range: GazeRange::default(),
        }
    }
}

impl BridgeConfig {
    /// Loads the config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let path = format!("{}/{}", CONFIG_DIR.as_ref(), FILE_NAME);
        File::open(&path)
            .ok()
            .and_then(|file| serde_json::from_reader(file).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: BridgeConfig = serde_json::from_str(r#"{"in_port": 9101}"#).unwrap();
        assert_eq!(config.in_port, 9101);
        assert_eq!(config.out_port, 9000);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.gaze_range.yaw_inner, 100.0);
    }

    #[test]
    fn gaze_range_is_configurable() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"gaze_range": {"min_pitch": 45.0, "max_pitch": -45.0}}"#)
                .unwrap();
        assert_eq!(config.gaze_range.min_pitch, 45.0);
        assert_eq!(config.gaze_range.max_pitch, -45.0);
        assert_eq!(config.gaze_range.yaw_outer, -100.0);
    }
}
