use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};
use tracing::{debug, warn};

use crate::domain::DomainError;

/// Fingerprints of default configs that shipped broken in earlier releases.
pub const KNOWN_BAD_CONFIG_FINGERPRINTS: &[&str] = &["913162c2ba44981a4db8fbc5fb8c48e6"];

/// Content fingerprinting for config files.
#[derive(Debug, Clone)]
pub struct ConfigIntegrityChecker {
    known_bad: Vec<String>,
}

impl Default for ConfigIntegrityChecker {
    fn default() -> Self {
        Self::with_known_bad(KNOWN_BAD_CONFIG_FINGERPRINTS.iter().copied())
    }
}

impl ConfigIntegrityChecker {
    /// Checker for the fingerprints shipped with this release.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checker for an explicit set of fingerprints (lowercase hex).
    pub fn with_known_bad<I, S>(fingerprints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_bad: fingerprints.into_iter().map(Into::into).collect(),
        }
    }

    /// MD5 of the full file content as lowercase hex.
    pub fn fingerprint(&self, path: &Path) -> Result<String, DomainError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Md5::new();

        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| DomainError::Io(e.to_string()))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// True only if the file exists, can be read, and matches a known-bad
    /// fingerprint. Read failures leave the file alone.
    pub fn is_known_bad(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        match self.fingerprint(path) {
            Ok(digest) => {
                debug!(path = ?path, md5 = %digest, "Config file fingerprint");
                self.known_bad.iter().any(|bad| *bad == digest)
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Could not fingerprint config file");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_fingerprint_known_values() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.yaml");
        let hello = dir.path().join("hello.yaml");
        fs::write(&empty, b"").unwrap();
        fs::write(&hello, b"hello world").unwrap();

        let checker = ConfigIntegrityChecker::new();
        assert_eq!(
            checker.fingerprint(&empty).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            checker.fingerprint(&hello).unwrap(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_fingerprint_changes_with_single_byte() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.yaml");
        let b = dir.path().join("b.yaml");
        fs::write(&a, b"port: 7890\n").unwrap();
        fs::write(&b, b"port: 7891\n").unwrap();

        let checker = ConfigIntegrityChecker::new();
        let first = checker.fingerprint(&a).unwrap();
        assert_eq!(first, checker.fingerprint(&a).unwrap());
        assert_eq!(first.len(), 32);
        assert_ne!(first, checker.fingerprint(&b).unwrap());
    }

    #[test]
    fn test_missing_file_is_not_known_bad() {
        let dir = tempfile::tempdir().unwrap();
        let checker = ConfigIntegrityChecker::new();
        assert!(!checker.is_known_bad(&dir.path().join("config.yaml")));
        assert!(checker.fingerprint(&dir.path().join("config.yaml")).is_err());
    }

    #[test]
    fn test_matching_fingerprint_is_known_bad() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, b"hello world").unwrap();

        let checker = ConfigIntegrityChecker::with_known_bad(["5eb63bbbe01eeed093cb22bb8f5acdc3"]);
        assert!(checker.is_known_bad(&path));
    }

    #[test]
    fn test_shipped_fingerprint_list() {
        let checker = ConfigIntegrityChecker::new();
        assert_eq!(checker.known_bad, vec!["913162c2ba44981a4db8fbc5fb8c48e6"]);
    }

    #[test]
    fn test_directory_is_not_known_bad() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!ConfigIntegrityChecker::new().is_known_bad(dir.path()));
    }

    #[test]
    fn test_ordinary_config_is_not_known_bad() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, b"mixed-port: 7890\nmode: rule\n").unwrap();
        assert!(!ConfigIntegrityChecker::new().is_known_bad(&path));
    }
}
