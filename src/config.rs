//! Server configuration from environment variables

use crate::camera::{FacingMode, ScanConfig, ScanRegion};
use std::net::SocketAddr;

pub const DEFAULT_VIP_MEMBERSHIP_URL: &str =
    "https://atlantapokerclub.com/league/memberships/vip-memberships/";

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const MAX_SCAN_RATE: u32 = 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory with the web client, served as fallback
    pub static_dir: String,
    /// Camera options handed to TD clients when a scan starts
    pub scan: ScanConfig,
    /// Link shown when a player asks for VIP chips
    pub vip_membership_url: String,
    /// Only allow sign-in on the game's weekday
    pub enforce_game_day: bool,
    /// Allow TDs to inject the sample payload without a camera
    pub allow_simulated_scan: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            static_dir: "static".to_string(),
            scan: ScanConfig::default(),
            vip_membership_url: DEFAULT_VIP_MEMBERSHIP_URL.to_string(),
            enforce_game_day: true,
            allow_simulated_scan: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match env_var("BIND_ADDR").map(|v| v.parse::<SocketAddr>()) {
            Some(Ok(addr)) => addr,
            Some(Err(e)) => {
                tracing::warn!("Invalid BIND_ADDR ({}), using {}", e, defaults.bind_addr);
                defaults.bind_addr
            }
            None => defaults.bind_addr,
        };

        let facing_mode = match env_var("SCAN_FACING_MODE").map(|v| v.parse::<FacingMode>()) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                tracing::warn!("{}, using {:?}", e, defaults.scan.facing_mode);
                defaults.scan.facing_mode
            }
            None => defaults.scan.facing_mode,
        };

        let scan_rate = env_var("SCAN_FPS")
            .and_then(|v| v.parse::<u32>().ok())
            .map(|fps| fps.clamp(1, MAX_SCAN_RATE))
            .unwrap_or(defaults.scan.scan_rate);

        let scan_region = match env_var("SCAN_REGION").map(|v| v.parse::<ScanRegion>()) {
            Some(Ok(region)) => region,
            Some(Err(e)) => {
                tracing::warn!("{}, using default scan region", e);
                defaults.scan.scan_region
            }
            None => defaults.scan.scan_region,
        };

        Self {
            bind_addr,
            static_dir: env_var("STATIC_DIR").unwrap_or(defaults.static_dir),
            scan: ScanConfig {
                facing_mode,
                scan_rate,
                scan_region,
            },
            vip_membership_url: env_var("VIP_MEMBERSHIP_URL")
                .unwrap_or(defaults.vip_membership_url),
            enforce_game_day: env_flag("ENFORCE_GAME_DAY").unwrap_or(defaults.enforce_game_day),
            allow_simulated_scan: env_flag("ALLOW_SIMULATED_SCAN")
                .unwrap_or(defaults.allow_simulated_scan),
        }
    }
}

/// Trimmed, non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// "0" and "false" switch a flag off, anything else switches it on
fn env_flag(key: &str) -> Option<bool> {
    env_var(key).map(|v| v != "0" && v.to_lowercase() != "false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "BIND_ADDR",
        "STATIC_DIR",
        "SCAN_FACING_MODE",
        "SCAN_FPS",
        "SCAN_REGION",
        "VIP_MEMBERSHIP_URL",
        "ENFORCE_GAME_DAY",
        "ALLOW_SIMULATED_SCAN",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    fn set_env(key: &str, value: &str) {
        std::env::set_var(key, value);
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.scan, ScanConfig::default());
        assert!(config.enforce_game_day);
        assert!(!config.allow_simulated_scan);
        assert_eq!(config.vip_membership_url, DEFAULT_VIP_MEMBERSHIP_URL);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        set_env("BIND_ADDR", "127.0.0.1:9000");
        set_env("SCAN_FACING_MODE", "front");
        set_env("SCAN_FPS", "120");
        set_env("SCAN_REGION", "300x180");
        set_env("ENFORCE_GAME_DAY", "false");
        set_env("ALLOW_SIMULATED_SCAN", "1");

        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.scan.facing_mode, FacingMode::Front);
        assert_eq!(config.scan.scan_rate, 60);
        assert_eq!(
            config.scan.scan_region,
            ScanRegion {
                width: 300,
                height: 180
            }
        );
        assert!(!config.enforce_game_day);
        assert!(config.allow_simulated_scan);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        set_env("BIND_ADDR", "nonsense");
        set_env("SCAN_FACING_MODE", "sideways");
        set_env("SCAN_FPS", "fast");
        set_env("SCAN_REGION", "big");
        set_env("STATIC_DIR", "   ");

        let config = ServerConfig::from_env();
        let defaults = ServerConfig::default();
        assert_eq!(config.bind_addr, defaults.bind_addr);
        assert_eq!(config.scan, defaults.scan);
        assert_eq!(config.static_dir, "static");
        clear_env();
    }
}
