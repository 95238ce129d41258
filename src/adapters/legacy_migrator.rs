use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::adapters::ConfigIntegrityChecker;
use crate::domain::ResolvedPaths;

/// Deprecated config file extension.
pub const LEGACY_EXTENSION: &str = "yml";
/// Current config file extension.
pub const CURRENT_EXTENSION: &str = "yaml";

/// One-shot cleanups for files left behind by older releases.
///
/// Every operation is safe to rerun: a migrated or purged file no longer
/// matches on the next pass.
pub struct LegacyMigrator<'a> {
    paths: &'a ResolvedPaths,
    checker: &'a ConfigIntegrityChecker,
}

impl<'a> LegacyMigrator<'a> {
    pub fn new(paths: &'a ResolvedPaths, checker: &'a ConfigIntegrityChecker) -> Self {
        Self { paths, checker }
    }

    /// Rename every `*.yml` directly inside the scan directory to `*.yaml`.
    ///
    /// Returns how many files were renamed. Failures are logged and the
    /// affected file is left for a later run.
    pub fn upgrade_extensions(&self) -> usize {
        let dir = self.paths.scan_dir();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = ?dir, error = %e, "Failed to list config directory");
                return 0;
            }
        };

        let mut migrated = 0;
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(dir = ?dir, error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            if !path.is_file() || !has_legacy_extension(&path) {
                continue;
            }

            let dest = path.with_extension(CURRENT_EXTENSION);
            if dest.exists() {
                warn!(from = ?path, to = ?dest, "Skipping rename, target already exists");
                continue;
            }

            match fs::rename(&path, &dest) {
                Ok(()) => {
                    info!(from = ?path, to = ?dest, "Renamed legacy config file");
                    migrated += 1;
                }
                Err(e) => {
                    warn!(
                        from = ?path,
                        to = ?dest,
                        error = %e,
                        "Failed to rename legacy config file"
                    );
                }
            }
        }

        migrated
    }

    /// Delete the default config if it matches a known-bad fingerprint.
    ///
    /// Returns whether the file was removed.
    pub fn purge_known_bad_default_config(&self) -> bool {
        let path = self.paths.default_config_path();
        if !self.checker.is_known_bad(&path) {
            debug!(path = ?path, "Default config kept");
            return false;
        }

        info!(path = ?path, "Removing known-bad default config");
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to remove known-bad default config");
                false
            }
        }
    }
}

fn has_legacy_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(LEGACY_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, ResolvedPaths) {
        let temp = tempfile::tempdir().unwrap();
        let paths = ResolvedPaths::with_root(temp.path());
        (temp, paths)
    }

    #[test]
    fn test_renames_yml_files() {
        let (_temp, paths) = setup();
        let dir = paths.config_dir();
        fs::write(dir.join("work.yml"), b"proxies: []\n").unwrap();
        fs::write(dir.join("home.yml"), b"mode: rule\n").unwrap();
        fs::write(dir.join("notes.txt"), b"keep me").unwrap();

        let checker = ConfigIntegrityChecker::new();
        let migrated = LegacyMigrator::new(&paths, &checker).upgrade_extensions();

        assert_eq!(migrated, 2);
        assert!(!dir.join("work.yml").exists());
        assert!(!dir.join("home.yml").exists());
        assert_eq!(fs::read(dir.join("work.yaml")).unwrap(), b"proxies: []\n");
        assert_eq!(fs::read(dir.join("home.yaml")).unwrap(), b"mode: rule\n");
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_second_run_is_noop() {
        let (_temp, paths) = setup();
        let dir = paths.config_dir();
        fs::write(dir.join("work.yml"), b"proxies: []\n").unwrap();

        let checker = ConfigIntegrityChecker::new();
        let migrator = LegacyMigrator::new(&paths, &checker);
        assert_eq!(migrator.upgrade_extensions(), 1);
        assert_eq!(migrator.upgrade_extensions(), 0);
        assert_eq!(fs::read(dir.join("work.yaml")).unwrap(), b"proxies: []\n");
    }

    #[test]
    fn test_does_not_recurse_or_touch_directories() {
        let (_temp, paths) = setup();
        let dir = paths.config_dir();
        fs::create_dir(dir.join("nested.yml")).unwrap();
        fs::write(dir.join("nested.yml").join("inner.yml"), b"x").unwrap();

        let checker = ConfigIntegrityChecker::new();
        assert_eq!(LegacyMigrator::new(&paths, &checker).upgrade_extensions(), 0);
        assert!(dir.join("nested.yml").join("inner.yml").exists());
    }

    #[test]
    fn test_existing_yaml_is_not_overwritten() {
        let (_temp, paths) = setup();
        let dir = paths.config_dir();
        fs::write(dir.join("work.yml"), b"old").unwrap();
        fs::write(dir.join("work.yaml"), b"new").unwrap();

        let checker = ConfigIntegrityChecker::new();
        assert_eq!(LegacyMigrator::new(&paths, &checker).upgrade_extensions(), 0);
        assert_eq!(fs::read(dir.join("work.yaml")).unwrap(), b"new");
        assert!(dir.join("work.yml").exists());
    }

    #[test]
    fn test_missing_scan_dir_is_tolerated() {
        let temp = tempfile::tempdir().unwrap();
        let paths = ResolvedPaths::with_root(temp.path().join("missing"));
        let checker = ConfigIntegrityChecker::new();
        assert_eq!(LegacyMigrator::new(&paths, &checker).upgrade_extensions(), 0);
    }

    #[test]
    fn test_purges_known_bad_config() {
        let (_temp, paths) = setup();
        fs::write(paths.default_config_path(), b"hello world").unwrap();

        // md5("hello world")
        let checker = ConfigIntegrityChecker::with_known_bad(["5eb63bbbe01eeed093cb22bb8f5acdc3"]);
        assert!(LegacyMigrator::new(&paths, &checker).purge_known_bad_default_config());
        assert!(!paths.default_config_path().exists());
    }

    #[test]
    fn test_keeps_other_config_byte_for_byte() {
        let (_temp, paths) = setup();
        let content = b"mixed-port: 7890\nallow-lan: false\n";
        fs::write(paths.default_config_path(), content).unwrap();

        let checker = ConfigIntegrityChecker::new();
        assert!(!LegacyMigrator::new(&paths, &checker).purge_known_bad_default_config());
        assert_eq!(fs::read(paths.default_config_path()).unwrap(), content);
    }

    #[test]
    fn test_purge_without_config_is_noop() {
        let (_temp, paths) = setup();
        let checker = ConfigIntegrityChecker::new();
        assert!(!LegacyMigrator::new(&paths, &checker).purge_known_bad_default_config());
    }
}
