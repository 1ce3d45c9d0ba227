//! Settings for the `plumewatch` binary.
//!
//! Settings come from, in increasing priority:
//!
//! 1. built-in defaults
//! 2. `plumewatch.toml` in the working directory, or the file passed with
//!    `--config`
//! 3. environment variables prefixed with `PLUMEWATCH`, e.g.
//!    `PLUMEWATCH_DATA_ROOT=/srv/water`
//!
//! ```toml
//! data_root = "data"
//! network = "ky2"
//! speed = "fast"
//! log_filter = "plumewatch=debug"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::session::Speed;

/// Default settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "plumewatch.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding `examples/` and `custom/` networks.
    pub data_root: PathBuf,
    /// Network to open; the first example network when unset.
    pub network: Option<String>,
    /// Playback speed.
    pub speed: Speed,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Settings {
    /// Load settings, reading `path` if given or the default file if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("data_root", "data")?
            .set_default("speed", "medium")?
            .set_default("log_filter", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix("PLUMEWATCH"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_settings_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            data_root = "/srv/water"
            network = "ky4"
            speed = "fast"
            "#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.data_root, PathBuf::from("/srv/water"));
        assert_eq!(settings.network.as_deref(), Some("ky4"));
        assert_eq!(settings.speed, Speed::Fast);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/plumewatch.toml"))).is_err());
    }
}
