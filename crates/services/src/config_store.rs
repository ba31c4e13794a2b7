//! On-disk configuration documents.
//!
//! Three JSON files live in the config directory: `settings.json`,
//! `models.json` and `voice_config.json`. Reads merge defaults over the
//! file; writes overwrite the whole document.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use shared::settings::{
    merge_settings, AppSettings, ModelsDocument, SettingsDocument, VoiceConfig,
};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const MODELS_FILE: &str = "models.json";
pub const VOICE_FILE: &str = "voice_config.json";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "AURA_CONFIG_DIR";

pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$AURA_CONFIG_DIR`, or `config/` under the working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config"));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn models_path(&self) -> PathBuf {
        self.dir.join(MODELS_FILE)
    }

    pub fn voice_path(&self) -> PathBuf {
        self.dir.join(VOICE_FILE)
    }

    /// Create the directory and write defaults for any missing file.
    pub fn ensure_files(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating config directory {}", self.dir.display()))?;

        if !self.settings_path().exists() {
            self.save_settings(&SettingsDocument::defaults())?;
        }
        if !self.models_path().exists() {
            self.save_models(&ModelsDocument::default())?;
        }
        if !self.voice_path().exists() {
            self.save_voice_config(&VoiceConfig::default())?;
        }
        Ok(())
    }

    /// Load settings merged over the defaults.
    ///
    /// A missing or unparsable file falls back to the defaults.
    pub fn load_settings(&self) -> SettingsDocument {
        match read_json(&self.settings_path()) {
            Ok(loaded) => SettingsDocument::from_loaded(loaded),
            Err(e) => {
                tracing::warn!("using default settings: {:#}", e);
                SettingsDocument::defaults()
            }
        }
    }

    /// Typed settings. A value of the wrong type is replaced by its default
    /// for this run; `repair_settings` fixes the file itself.
    pub fn load_app_settings(&self) -> AppSettings {
        let doc = self.load_settings();
        doc.typed().unwrap_or_else(|e| {
            tracing::warn!(
                "settings.json has a value of the wrong type ({}), using defaults for it",
                e
            );
            doc.sanitized().typed().unwrap_or_default()
        })
    }

    pub fn save_settings(&self, settings: &SettingsDocument) -> Result<()> {
        write_json(&self.settings_path(), settings.as_value())?;
        tracing::debug!("settings saved to {}", self.settings_path().display());
        Ok(())
    }

    /// Rewrite the settings file with every default key filled in and
    /// wrong-typed values reset.
    pub fn repair_settings(&self) -> Result<SettingsDocument> {
        let doc = self.load_settings().sanitized();
        self.save_settings(&doc)?;
        Ok(doc)
    }

    pub fn set_module_enabled(&self, module_id: &str, enabled: bool) -> Result<SettingsDocument> {
        self.update_settings(&["modules", module_id], Value::Bool(enabled))
    }

    pub fn set_local_model(&self, model: &str) -> Result<SettingsDocument> {
        self.update_settings(&["ai", "local_model"], Value::String(model.to_string()))
    }

    fn update_settings(&self, path: &[&str], value: Value) -> Result<SettingsDocument> {
        let mut doc = self.load_settings();
        doc.set(path, value);
        self.save_settings(&doc)?;
        Ok(doc)
    }

    pub fn load_models(&self) -> ModelsDocument {
        read_json(&self.models_path())
            .and_then(|v| serde_json::from_value(v).context("models.json has unexpected shape"))
            .unwrap_or_else(|e| {
                tracing::warn!("using default model list: {:#}", e);
                ModelsDocument::default()
            })
    }

    pub fn save_models(&self, models: &ModelsDocument) -> Result<()> {
        write_json(&self.models_path(), models)
    }

    pub fn load_voice_config(&self) -> VoiceConfig {
        let defaults = serde_json::to_value(VoiceConfig::default()).unwrap_or(Value::Null);
        read_json(&self.voice_path())
            .map(|loaded| merge_settings(&defaults, &loaded))
            .and_then(|v| serde_json::from_value(v).context("voice_config.json has unexpected shape"))
            .unwrap_or_else(|e| {
                tracing::warn!("using default voice config: {:#}", e);
                VoiceConfig::default()
            })
    }

    pub fn save_voice_config(&self, voice: &VoiceConfig) -> Result<()> {
        write_json(&self.voice_path(), voice)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Pretty JSON with a four-space indent, non-ASCII left unescaped.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .with_context(|| format!("serializing {}", path.display()))?;

    fs::write(path, buf).with_context(|| format!("writing {}", path.display()))
}
