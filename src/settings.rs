//! Persisted user settings.
//!
//! Settings live in a JSON file, by default at
//! `$XDG_CONFIG_HOME/gridsnap/settings.json`. A missing file is not an
//! error — every value has a compiled-in default — but an unreadable or
//! unparseable file is: the daemon refuses to start on a broken store
//! rather than silently running with defaults the user did not choose.
//!
//! # Example
//!
//! ```json
//! {
//!   "animate-movement": true,
//!   "animation-duration": 150,
//!   "padding-inner": 8,
//!   "padding-outer": 8,
//!   "last-active-preset": "9"
//! }
//! ```

use crate::catalog;
use crate::geometry::Padding;
use crate::traits::SettingsStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// On-disk schema. Every field is optional; a minimal `{}` file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct SettingsDoc {
    /// Whether window placement is animated.
    animate_movement: bool,
    /// Placement animation length in **milliseconds**.
    animation_duration: u64,
    /// Gap between adjacent tiles, in pixels.
    padding_inner: i32,
    /// Gap between tiles and the work-area border, in pixels.
    padding_outer: i32,
    /// Key of the most recently applied grid preset.
    last_active_preset: String,
}

impl Default for SettingsDoc {
    fn default() -> Self {
        Self {
            animate_movement: true,
            animation_duration: 150,
            padding_inner: 8,
            padding_outer: 8,
            last_active_preset: catalog::DEFAULT_PRESET_KEY.to_string(),
        }
    }
}

/// File-backed [`SettingsStore`].
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    doc: SettingsDoc,
}

impl FileSettings {
    /// Load settings from the JSON file at `path`.
    ///
    /// A missing file yields the defaults; any other read error, and any
    /// parse error, is fatal.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        let doc = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| SettingsError(format!("failed to parse {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SettingsDoc::default(),
            Err(e) => {
                return Err(SettingsError(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self { path, doc })
    }

    /// The conventional settings path under the user's config directory.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(dir).join("gridsnap").join("settings.json"))
        } else if let Some(home) = std::env::var_os("HOME") {
            Ok(PathBuf::from(home)
                .join(".config")
                .join("gridsnap")
                .join("settings.json"))
        } else {
            Err(SettingsError(
                "neither XDG_CONFIG_HOME nor HOME is set".into(),
            ))
        }
    }

    fn persist(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let contents = serde_json::to_string_pretty(&self.doc)
            .map_err(|e| SettingsError(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| SettingsError(format!("failed to write {}: {}", self.path.display(), e)))
    }
}

impl SettingsStore for FileSettings {
    type Error = SettingsError;

    fn animate_movement(&self) -> bool {
        self.doc.animate_movement
    }

    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.doc.animation_duration)
    }

    fn padding(&self) -> Padding {
        // Negative values in a hand-edited file would corrupt the geometry.
        Padding {
            inner: self.doc.padding_inner.max(0),
            outer: self.doc.padding_outer.max(0),
        }
    }

    fn last_active_preset(&self) -> String {
        self.doc.last_active_preset.clone()
    }

    fn set_last_active_preset(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.doc.last_active_preset != key {
            self.doc.last_active_preset = key.to_string();
            self.persist()?;
        }
        Ok(())
    }
}

/// Error from loading, parsing, or persisting the settings file.
#[derive(Debug, thiserror::Error)]
#[error("settings error: {0}")]
pub struct SettingsError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A unique path in the system temp dir that does not exist yet.
    fn temp_path() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "gridsnap-settings-test-{}-{}.json",
            std::process::id(),
            n
        ))
    }

    struct Cleanup(PathBuf);
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = FileSettings::load(temp_path()).unwrap();
        assert!(settings.animate_movement());
        assert_eq!(settings.animation_duration(), Duration::from_millis(150));
        assert_eq!(settings.padding(), Padding { inner: 8, outer: 8 });
        assert_eq!(settings.last_active_preset(), "9");
    }

    #[test]
    fn full_file_round_trips() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());
        std::fs::write(
            &path,
            r#"{
                "animate-movement": false,
                "animation-duration": 300,
                "padding-inner": 4,
                "padding-outer": 16,
                "last-active-preset": "5"
            }"#,
        )
        .unwrap();

        let settings = FileSettings::load(path).unwrap();
        assert!(!settings.animate_movement());
        assert_eq!(settings.animation_duration(), Duration::from_millis(300));
        assert_eq!(settings.padding(), Padding { inner: 4, outer: 16 });
        assert_eq!(settings.last_active_preset(), "5");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, r#"{ "padding-inner": 0 }"#).unwrap();

        let settings = FileSettings::load(path).unwrap();
        assert_eq!(settings.padding(), Padding { inner: 0, outer: 8 });
        assert!(settings.animate_movement());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, r#"{ "future-setting": 42 }"#).unwrap();
        assert!(FileSettings::load(path).is_ok());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, "not json").unwrap();
        assert!(FileSettings::load(path).is_err());
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        // A directory at the settings path is readable as a path but not
        // as a file, and must not fall back to defaults.
        let path = temp_path();
        std::fs::create_dir(&path).unwrap();
        let result = FileSettings::load(path.clone());
        std::fs::remove_dir(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn negative_padding_is_clamped() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, r#"{ "padding-inner": -5, "padding-outer": -1 }"#).unwrap();
        let settings = FileSettings::load(path).unwrap();
        assert_eq!(settings.padding(), Padding { inner: 0, outer: 0 });
    }

    #[test]
    fn set_last_active_preset_persists() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());

        let mut settings = FileSettings::load(path.clone()).unwrap();
        settings.set_last_active_preset("7").unwrap();

        let reloaded = FileSettings::load(path).unwrap();
        assert_eq!(reloaded.last_active_preset(), "7");
        // The untouched values survive the write-back.
        assert_eq!(reloaded.animation_duration(), Duration::from_millis(150));
    }

    #[test]
    fn setting_the_same_preset_does_not_touch_the_file() {
        let path = temp_path();
        let mut settings = FileSettings::load(path.clone()).unwrap();
        settings.set_last_active_preset("9").unwrap();
        assert!(!path.exists(), "unchanged value should not create the file");
    }

    #[test]
    fn disk_format_uses_kebab_case_keys() {
        let path = temp_path();
        let _cleanup = Cleanup(path.clone());
        let mut settings = FileSettings::load(path.clone()).unwrap();
        settings.set_last_active_preset("3").unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"last-active-preset\""));
        assert!(on_disk.contains("\"animate-movement\""));
    }
}
