//! Layout of the data root: which networks exist and where they live.
//!
//! ```text
//! <data root>/
//! ├── examples/<network>/   bundled networks
//! │   ├── <network>.inp
//! │   ├── metadata.yml      (optional)
//! │   └── <network>/<injection node>.json ...
//! └── custom/<network>/     user networks, same layout
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{KeyKind, PlumeError, Result};

pub const EXAMPLES_DIR: &str = "examples";
pub const CUSTOM_DIR: &str = "custom";

/// Sorted names of the subdirectories of `dir`. A missing `dir` is empty.
fn list_networks(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PlumeError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PlumeError::io(dir, e))?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Networks bundled under `examples/`.
pub fn example_networks(data_root: &Path) -> Result<Vec<String>> {
    list_networks(&data_root.join(EXAMPLES_DIR))
}

/// Networks added by the user under `custom/`.
pub fn custom_networks(data_root: &Path) -> Result<Vec<String>> {
    list_networks(&data_root.join(CUSTOM_DIR))
}

/// Directory holding a network's files. A custom network shadows an
/// example of the same name.
pub fn network_dir(data_root: &Path, network: &str) -> Result<PathBuf> {
    [CUSTOM_DIR, EXAMPLES_DIR]
        .iter()
        .map(|kind| data_root.join(kind).join(network))
        .find(|dir| dir.is_dir())
        .ok_or_else(|| PlumeError::key_not_found(KeyKind::Network, network))
}

/// [`network_dir`] for loaders: a network that is not on disk means there is
/// no data to load, reported as `DataNotFound` at `<data root>/<network>`.
pub(crate) fn existing_network_dir(data_root: &Path, network: &str) -> Result<PathBuf> {
    network_dir(data_root, network).map_err(|e| {
        if e.is_key_not_found(KeyKind::Network) {
            PlumeError::DataNotFound {
                path: data_root.join(network),
            }
        } else {
            e
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn data_root(examples: &[&str], custom: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        for name in examples {
            fs::create_dir_all(root.path().join(EXAMPLES_DIR).join(name)).unwrap();
        }
        for name in custom {
            fs::create_dir_all(root.path().join(CUSTOM_DIR).join(name)).unwrap();
        }
        fs::write(root.path().join(EXAMPLES_DIR).join("README"), "not a network").unwrap();
        root
    }

    #[test]
    fn test_example_networks_sorted() {
        let root = data_root(&["ky9", "ky14", "ky2", "ky4", "ky8"], &[]);
        assert_eq!(
            example_networks(root.path()).unwrap(),
            vec!["ky14", "ky2", "ky4", "ky8", "ky9"]
        );
    }

    #[test]
    fn test_no_custom_networks_by_default() {
        let root = data_root(&["ky2"], &[]);
        assert!(custom_networks(root.path()).unwrap().is_empty());
    }

    #[test]
    fn test_network_dir_bad_name() {
        let root = data_root(&["ky2"], &[]);
        let err = network_dir(root.path(), "bad network name").unwrap_err();
        assert!(err.is_key_not_found(KeyKind::Network));
    }

    #[test]
    fn test_existing_network_dir_missing_is_data_not_found() {
        let root = data_root(&["ky2"], &[]);
        match existing_network_dir(root.path(), "ky99") {
            Err(PlumeError::DataNotFound { path }) => assert_eq!(path, root.path().join("ky99")),
            other => panic!("expected DataNotFound, got {:?}", other),
        }
        assert!(existing_network_dir(root.path(), "ky2").is_ok());
    }

    #[test]
    fn test_network_dir_example_and_custom() {
        let root = data_root(&["ky2", "ky4"], &["ky4"]);
        let ky2 = network_dir(root.path(), "ky2").unwrap();
        assert!(ky2.ends_with("examples/ky2"));
        let ky4 = network_dir(root.path(), "ky4").unwrap();
        assert!(ky4.ends_with("custom/ky4"));
    }
}
