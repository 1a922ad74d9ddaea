//! Settings loading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` (by file
//! name) will be used. If no RON files are found or if no parsing succeeds,
//! default settings will be used.
use crate::ron_loader::load_ron_files;
use crate::settings::Settings;
use bevy::log::info;

/// Load settings from `path` (directory).
///
/// # Example
/// ```
/// let settings = strider::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.session.tick_rate > 0.0);
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        first
    } else {
        info!("no settings found in {path}, using defaults");
        Settings::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_file_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.ron"), "(physics: (gravity: 0.05))").expect("write");
        std::fs::write(dir.path().join("b.ron"), "(physics: (gravity: 0.5))").expect("write");
        let settings = load_settings_from_dir(dir.path().to_str().expect("utf8 path"));
        assert_eq!(settings.physics.gravity, 0.05);
    }

    #[test]
    fn missing_dir_gives_defaults() {
        let settings = load_settings_from_dir("no/such/settings");
        assert_eq!(settings.physics, crate::settings::PhysicsSettings::default());
    }
}
