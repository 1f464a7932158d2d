//! Project-level defaults for fields, loaded with Figment.
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `fieldset.{toml,yaml,yml,json}` in the project directory
//! 3. Environment variables prefixed with `FIELDSET_`, nested with `__`
//!    (`FIELDSET_FILE__DISK=s3` sets `file.disk`)
//!
//! Defaults only fill options a field left unset; anything configured on the
//! field itself wins.

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::field::Field;
use crate::types::{FieldKind, Preload, DEFAULT_DISK, DEFAULT_PATH};

/// File name (without extension) looked up in the project directory.
pub const CONFIG_FILE_STEM: &str = "fieldset";

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "FIELDSET_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldsConfig {
    pub file: FileDefaults,
    pub audio: AudioDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileDefaults {
    pub disk: String,
    pub path: String,
    /// Maximum upload size in kilobytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

impl Default for FileDefaults {
    fn default() -> Self {
        Self {
            disk: DEFAULT_DISK.to_string(),
            path: DEFAULT_PATH.to_string(),
            max_size: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioDefaults {
    pub preload: Preload,
}

impl FieldsConfig {
    /// Load configuration for a project directory from all sources.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self> {
        let config: FieldsConfig = Self::figment(project_dir.as_ref()).extract()?;
        debug!(disk = %config.file.disk, preload = %config.audio.preload, "loaded fields config");
        Ok(config)
    }

    /// The layered figment, exposed so callers can merge further providers.
    pub fn figment(project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(FieldsConfig::default()));

        for ext in ["toml", "yaml", "yml", "json"] {
            let path = project_dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            if !path.is_file() {
                continue;
            }
            trace!(path = %path.display(), "merging config file");
            figment = match ext {
                "toml" => figment.merge(Toml::file(&path)),
                "json" => figment.merge(Json::file(&path)),
                _ => figment.merge(Yaml::file(&path)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Fill unset file and audio options of a field from these defaults.
    pub fn apply(&self, field: &mut Field) {
        let kind = field.kind_mut();
        if let Some(opts) = kind.file_options_mut() {
            opts.disk.get_or_insert_with(|| self.file.disk.clone());
            opts.path.get_or_insert_with(|| self.file.path.clone());
            if opts.max_size.is_none() {
                opts.max_size = self.file.max_size;
            }
        }
        if let FieldKind::Audio(opts) = kind {
            opts.preload.get_or_insert(self.audio.preload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn defaults_without_sources() {
        let tmp = TempDir::new().unwrap();
        let config = FieldsConfig::load(tmp.path()).unwrap();
        assert_eq!(config, FieldsConfig::default());
        assert_eq!(config.file.disk, "public");
        assert_eq!(config.audio.preload, Preload::Metadata);
    }

    #[test]
    #[serial]
    fn toml_file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("fieldset.toml"),
            "[file]\ndisk = \"s3\"\nmax_size = 2048\n\n[audio]\npreload = \"none\"\n",
        )
        .unwrap();

        let config = FieldsConfig::load(tmp.path()).unwrap();
        assert_eq!(config.file.disk, "s3");
        assert_eq!(config.file.path, "/");
        assert_eq!(config.file.max_size, Some(2048));
        assert_eq!(config.audio.preload, Preload::None);
    }

    #[test]
    #[serial]
    fn yaml_file_is_read() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("fieldset.yaml"), "file:\n  path: uploads\n").unwrap();
        let config = FieldsConfig::load(tmp.path()).unwrap();
        assert_eq!(config.file.path, "uploads");
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("fieldset.toml"), "[file]\ndisk = \"s3\"\n").unwrap();

        std::env::set_var("FIELDSET_FILE__DISK", "local");
        let config = FieldsConfig::load(tmp.path());
        std::env::remove_var("FIELDSET_FILE__DISK");

        assert_eq!(config.unwrap().file.disk, "local");
    }

    #[test]
    #[serial]
    fn invalid_preload_in_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("fieldset.toml"),
            "[audio]\npreload = \"eager\"\n",
        )
        .unwrap();
        assert!(FieldsConfig::load(tmp.path()).is_err());
    }

    #[test]
    fn apply_fills_only_unset_options() {
        let config = FieldsConfig {
            file: FileDefaults {
                disk: "s3".into(),
                path: "media".into(),
                max_size: Some(4096),
            },
            audio: AudioDefaults {
                preload: Preload::None,
            },
        };

        let mut song = Field::audio("Theme Song").path("songs");
        config.apply(&mut song);
        let meta = song.meta();
        assert_eq!(meta["disk"], json!("s3"));
        assert_eq!(meta["path"], json!("songs"));
        assert_eq!(meta["maxSize"], json!(4096));
        assert_eq!(song.preload_mode(), Some(Preload::None));

        let mut explicit = Field::audio("Intro").preload(Preload::Auto);
        config.apply(&mut explicit);
        assert_eq!(explicit.preload_mode(), Some(Preload::Auto));
    }

    #[test]
    fn apply_ignores_non_file_fields() {
        let config = FieldsConfig::default();
        let mut name = Field::text("Name");
        config.apply(&mut name);
        assert!(name.meta().is_empty());
    }
}
