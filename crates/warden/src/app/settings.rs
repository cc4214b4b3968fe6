use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub(crate) const SETTINGS_ENV_VAR: &str = "WARDEN_SETTINGS";

const DEFAULT_DEMO_FRAMES: u64 = 600;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WardenSettings {
    pub(crate) animation_enabled: bool,
    pub(crate) teammate_enabled: bool,
    pub(crate) rng_seed: Option<u64>,
    pub(crate) demo_frames: u64,
}

impl Default for WardenSettings {
    fn default() -> Self {
        Self {
            animation_enabled: true,
            teammate_enabled: true,
            rng_seed: None,
            demo_frames: DEFAULT_DEMO_FRAMES,
        }
    }
}

/// Settings are optional: a missing file or env var falls back to
/// defaults, an invalid file falls back with a warning. Settings problems
/// are never fatal.
pub(crate) fn load_from_env() -> WardenSettings {
    match env::var(SETTINGS_ENV_VAR) {
        Ok(path) => load_from_path(Path::new(&path)),
        Err(env::VarError::NotPresent) => {
            debug!(env_var = SETTINGS_ENV_VAR, "settings_env_unset_using_defaults");
            WardenSettings::default()
        }
        Err(err) => {
            warn!(
                env_var = SETTINGS_ENV_VAR,
                error = %err,
                "settings_env_unreadable_using_defaults"
            );
            WardenSettings::default()
        }
    }
}

pub(crate) fn load_from_path(path: &Path) -> WardenSettings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "settings_unreadable_using_defaults"
            );
            return WardenSettings::default();
        }
    };
    match parse_settings_json(&raw) {
        Ok(settings) => {
            debug!(path = %path.display(), "settings_loaded");
            normalize(settings)
        }
        Err(message) => {
            warn!(path = %path.display(), %message, "settings_invalid_using_defaults");
            WardenSettings::default()
        }
    }
}

fn parse_settings_json(raw: &str) -> Result<WardenSettings, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, WardenSettings>(&mut deserializer) {
        Ok(settings) => Ok(settings),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse settings json: {source}"))
            } else {
                Err(format!("parse settings json at {path}: {source}"))
            }
        }
    }
}

fn normalize(mut settings: WardenSettings) -> WardenSettings {
    if settings.demo_frames == 0 {
        warn!(
            fallback = DEFAULT_DEMO_FRAMES,
            "demo_frames_zero_using_fallback"
        );
        settings.demo_frames = DEFAULT_DEMO_FRAMES;
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = load_from_path(&dir.path().join("absent.json"));
        assert_eq!(settings, WardenSettings::default());
    }

    #[test]
    fn valid_file_round_trips() {
        let file = write_settings_file(
            r#"{
                "animation_enabled": false,
                "teammate_enabled": true,
                "rng_seed": 42,
                "demo_frames": 120
            }"#,
        );
        let settings = load_from_path(file.path());
        assert!(!settings.animation_enabled);
        assert!(settings.teammate_enabled);
        assert_eq!(settings.rng_seed, Some(42));
        assert_eq!(settings.demo_frames, 120);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let file = write_settings_file(r#"{ "rng_seed": 7 }"#);
        let settings = load_from_path(file.path());
        assert_eq!(
            settings,
            WardenSettings {
                rng_seed: Some(7),
                ..WardenSettings::default()
            }
        );
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        let file = write_settings_file("{ not json");
        assert_eq!(load_from_path(file.path()), WardenSettings::default());
    }

    #[test]
    fn unknown_field_is_rejected_and_falls_back() {
        let file = write_settings_file(r#"{ "animation_enbaled": true }"#);
        assert_eq!(load_from_path(file.path()), WardenSettings::default());
    }

    #[test]
    fn parse_error_message_names_the_json_path() {
        let error = parse_settings_json(r#"{ "demo_frames": "lots" }"#).expect_err("type error");
        assert!(error.contains("demo_frames"), "message was: {error}");
    }

    #[test]
    fn zero_demo_frames_is_normalized() {
        let file = write_settings_file(r#"{ "demo_frames": 0 }"#);
        let settings = load_from_path(file.path());
        assert_eq!(settings.demo_frames, DEFAULT_DEMO_FRAMES);
    }
}
