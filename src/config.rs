use rinkaudio_audio::{AudioSettings, RetryPolicy};
use rinkaudio_physics::ClassifierTuning;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/rinkaudio.toml";

/// Everything the sound system reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RinkAudioConfig {
    pub audio: AudioSettings,
    pub classifier: ClassifierTuning,
    pub assets: AssetsConfig,
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory standing in for the embedded resources.
    pub resource_root: PathBuf,
    /// Optional directory of loose sound files.
    pub external_dir: Option<PathBuf>,
    /// Register `.wav` files from `external_dir` by file-name prefix.
    pub register_external: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from("assets"),
            external_dir: None,
            register_external: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Attempts at opening the playback sink.
    pub manager_attempts: u32,
    /// Pause between attempts in milliseconds.
    pub retry_pause_ms: u64,
    /// Fixed seed for variant selection.
    pub rng_seed: Option<u64>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            manager_attempts: 3,
            retry_pause_ms: 100,
            rng_seed: None,
        }
    }
}

impl StartupConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.manager_attempts,
            pause: Duration::from_millis(self.retry_pause_ms),
        }
    }
}

impl RinkAudioConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<RinkAudioConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    RinkAudioConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                RinkAudioConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = RinkAudioConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(cfg, RinkAudioConfig::default());
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[audio\nmaster = ").expect("write config");
        assert_eq!(
            RinkAudioConfig::load_from_path(&path),
            RinkAudioConfig::default()
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rinkaudio.toml");
        fs::write(
            &path,
            r#"
[audio]
sfx = 0.5

[classifier]
min_shot_force = 12.0

[assets]
external_dir = "sounds"

[startup]
rng_seed = 7
"#,
        )
        .expect("write config");

        let cfg = RinkAudioConfig::load_from_path(&path);
        assert_eq!(cfg.audio.sfx, 0.5);
        assert_eq!(cfg.audio.master, 1.0);
        assert_eq!(cfg.classifier.min_shot_force, 12.0);
        assert_eq!(cfg.classifier.min_drag_time, 0.1);
        assert_eq!(cfg.assets.external_dir, Some(PathBuf::from("sounds")));
        assert!(cfg.assets.register_external);
        assert_eq!(cfg.startup.rng_seed, Some(7));
        assert_eq!(cfg.startup.manager_attempts, 3);
    }

    #[test]
    fn retry_policy_from_startup() {
        let startup = StartupConfig {
            manager_attempts: 5,
            retry_pause_ms: 20,
            rng_seed: None,
        };
        assert_eq!(
            startup.retry_policy(),
            RetryPolicy {
                attempts: 5,
                pause: Duration::from_millis(20),
            }
        );
    }

    #[test]
    fn shipped_config_parses() {
        let contents =
            fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH))
                .expect("shipped config");
        let cfg: RinkAudioConfig = toml::from_str(&contents).expect("parse shipped config");
        assert_eq!(cfg.classifier, ClassifierTuning::default());
    }
}
