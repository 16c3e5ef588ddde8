use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ASSETS_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Server configuration, resolved once at startup from CLI flags and
/// environment variables (`TASKD_PORT`, `TASKD_DATA_DIR`, `TASKD_ASSETS_DIR`,
/// `TASKD_LOG`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Directory holding the task database. Required; there is no default —
    /// a missing value is a startup error, not a silent fallback.
    pub data_dir: PathBuf,
    /// Prebuilt SPA bundle served for non-API requests.
    pub assets_dir: PathBuf,
    /// Tracing filter (e.g. "info", "taskd=debug").
    pub log_level: String,
}

impl AppConfig {
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        assets_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self> {
        let Some(data_dir) = data_dir else {
            bail!("data directory not configured — set TASKD_DATA_DIR or pass --data-dir");
        };
        Ok(Self {
            port: port.unwrap_or(DEFAULT_PORT),
            data_dir,
            assets_dir: assets_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
            log_level: log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_required() {
        let err = AppConfig::new(None, None, None, None).unwrap_err();
        assert!(err.to_string().contains("TASKD_DATA_DIR"));
    }

    #[test]
    fn defaults_fill_the_rest() {
        let config =
            AppConfig::new(None, Some(PathBuf::from("/tmp/taskd")), None, None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.assets_dir, PathBuf::from("dist"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn explicit_values_win() {
        let config = AppConfig::new(
            Some(9999),
            Some(PathBuf::from("/tmp/taskd")),
            Some(PathBuf::from("web/build")),
            Some("debug".to_string()),
        )
        .unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.assets_dir, PathBuf::from("web/build"));
        assert_eq!(config.log_level, "debug");
    }
}
