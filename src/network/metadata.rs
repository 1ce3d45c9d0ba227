//! Optional per-network display metadata (`metadata.yml`).

use std::path::Path;

use config::{Config, File, FileFormat};

use crate::error::Result;

/// Name of the metadata file inside a network directory.
pub const METADATA_FILE: &str = "metadata.yml";

/// Offset added to every node coordinate, read from `metadata.yml`.
///
/// Missing file means no offset.
pub fn layout_offset(network_dir: &Path) -> Result<(f64, f64)> {
    let path = network_dir.join(METADATA_FILE);
    if !path.is_file() {
        return Ok((0.0, 0.0));
    }

    let metadata = Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml))
        .build()?;
    let x_offset = metadata.get_float("x_offset")?;
    let y_offset = metadata.get_float("y_offset")?;
    Ok((x_offset, y_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlumeError;
    use tempfile::TempDir;

    #[test]
    fn test_missing_metadata_is_zero_offset() {
        let dir = TempDir::new().unwrap();
        assert_eq!(layout_offset(dir.path()).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_reads_offsets() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(METADATA_FILE),
            "x_offset: -9476000.5\ny_offset: 4480000\n",
        )
        .unwrap();
        assert_eq!(layout_offset(dir.path()).unwrap(), (-9476000.5, 4480000.0));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), "x_offset: 1.0\n").unwrap();
        let err = layout_offset(dir.path()).unwrap_err();
        assert!(matches!(err, PlumeError::Config(_)));
    }
}
