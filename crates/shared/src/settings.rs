//! Settings documents and their typed views.
//!
//! Settings live on disk as a free-form JSON tree. Defaults are merged
//! recursively over whatever the user has saved, so keys introduced by a
//! newer build appear without clobbering existing values. Unknown keys are
//! carried along untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub local_model: String, // e.g. "qwen3" for Ollama
    pub cloud_model: String, // e.g. "gpt-4"
    pub use_cloud: bool,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            local_model: "qwen3".into(),
            cloud_model: "gpt-4".into(),
            use_cloud: false,
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub enabled: bool,
    pub wake_word: String,
    pub language: String,
    pub speech_rate: u32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            wake_word: "asistent".into(),
            language: "sk-SK".into(),
            speech_rate: 150,
        }
    }
}

/// Window preferences. Only persisted; the terminal front end ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub theme: String,
    pub font_size: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub sidebar_width: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
            font_size: 12,
            window_width: 1400,
            window_height: 900,
            sidebar_width: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// OpenWeatherMap key; empty means "use OPENWEATHER_API_KEY"
    pub api_key: String,
    pub default_city: String,
    pub units: String,
    pub lang: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_city: "Bratislava".into(),
            units: "metric".into(),
            lang: "sk".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub handler_timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            handler_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub ai: AiSettings,
    pub voice: VoiceSettings,
    pub ui: UiSettings,
    /// Per-module enable flags, keyed by module id
    pub modules: BTreeMap<String, bool>,
    pub weather: WeatherSettings,
    pub assistant: AssistantSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        let modules = [
            ("file_manager", true),
            ("code_analyzer", true),
            ("system_tools", true),
            ("web_tools", false),
        ]
        .into_iter()
        .map(|(id, on)| (id.to_string(), on))
        .collect();

        Self {
            ai: AiSettings::default(),
            voice: VoiceSettings::default(),
            ui: UiSettings::default(),
            modules,
            weather: WeatherSettings::default(),
            assistant: AssistantSettings::default(),
        }
    }
}

impl AppSettings {
    /// Modules without an explicit flag are enabled.
    pub fn is_module_enabled(&self, module_id: &str) -> bool {
        self.modules.get(module_id).copied().unwrap_or(true)
    }
}

/// The full settings tree as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDocument {
    root: Value,
}

impl SettingsDocument {
    pub fn defaults() -> Self {
        Self {
            root: default_settings(),
        }
    }

    /// Merge `loaded` over the defaults.
    pub fn from_loaded(loaded: Value) -> Self {
        Self {
            root: merge_settings(&default_settings(), &loaded),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Typed view over the document.
    pub fn typed(&self) -> Result<AppSettings, serde_json::Error> {
        serde_json::from_value(self.root.clone())
    }

    /// Copy of the document where every value whose JSON type disagrees
    /// with its default is reset to the default. Module flags that are not
    /// booleans are dropped. Unknown keys are kept.
    pub fn sanitized(&self) -> SettingsDocument {
        let mut root = conform(&default_settings(), &self.root);
        if let Some(Value::Object(flags)) = root.get_mut("modules") {
            flags.retain(|_, flag| flag.is_boolean());
        }
        Self { root }
    }

    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.root, |node, key| node.get(key))
    }

    /// Set a value at `path`, creating intermediate objects. A non-object
    /// found along the way is replaced by an object.
    pub fn set(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            self.root = value;
            return;
        };

        let mut node = &mut self.root;
        for key in parents {
            node = ensure_object(node)
                .entry(key.to_string())
                .or_insert(Value::Null);
        }
        ensure_object(node).insert(last.to_string(), value);
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn conform(default: &Value, loaded: &Value) -> Value {
    match (default, loaded) {
        (Value::Object(base), Value::Object(over)) => {
            let mut out = over.clone();
            for (key, value) in out.iter_mut() {
                if let Some(expected) = base.get(key) {
                    *value = conform(expected, value);
                }
            }
            for (key, expected) in base {
                out.entry(key.clone()).or_insert_with(|| expected.clone());
            }
            Value::Object(out)
        }
        (expected, value) if same_kind(expected, value) => value.clone(),
        (expected, _) => expected.clone(),
    }
}

/// Integer defaults only accept non-negative integers.
fn same_kind(expected: &Value, value: &Value) -> bool {
    match (expected, value) {
        (Value::Bool(_), Value::Bool(_))
        | (Value::String(_), Value::String(_))
        | (Value::Array(_), Value::Array(_)) => true,
        (Value::Number(e), Value::Number(v)) => !e.is_u64() || v.is_u64(),
        _ => false,
    }
}

pub fn default_settings() -> Value {
    serde_json::to_value(AppSettings::default()).unwrap_or(Value::Object(Map::new()))
}

/// Recursively merge `loaded` over `default`.
///
/// Where both sides hold an object the merge recurses; otherwise the
/// loaded value wins. Keys only present in `loaded` are kept.
pub fn merge_settings(default: &Value, loaded: &Value) -> Value {
    match (default, loaded) {
        (Value::Object(base), Value::Object(over)) => {
            let mut result = base.clone();
            for (key, value) in over {
                let merged = match result.get(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_settings(existing, value)
                    }
                    _ => value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        (_, over) => over.clone(),
    }
}

/// Known model names offered in the model picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsDocument {
    pub available_models: Vec<String>,
}

impl Default for ModelsDocument {
    fn default() -> Self {
        Self {
            available_models: vec!["qwen3".into(), "llama2".into(), "mistral".into()],
        }
    }
}

/// Speech settings kept in their own file for the voice front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub wake_word: String,
    pub language: String,
    pub speech_rate: u32,
    pub volume: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            wake_word: "asistent".into(),
            language: "sk-SK".into(),
            speech_rate: 150,
            volume: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_user_value_and_adds_defaults() {
        let default = json!({"voice": {"enabled": true, "wake_word": "asistent"}});
        let loaded = json!({"voice": {"wake_word": "custom"}});

        let merged = merge_settings(&default, &loaded);
        assert_eq!(
            merged,
            json!({"voice": {"enabled": true, "wake_word": "custom"}})
        );
    }

    #[test]
    fn test_merge_keeps_unknown_keys() {
        let default = json!({"ai": {"local_model": "qwen3"}});
        let loaded = json!({"ai": {"extra": 1}, "plugins": ["x"]});

        let merged = merge_settings(&default, &loaded);
        assert_eq!(merged["ai"]["local_model"], "qwen3");
        assert_eq!(merged["ai"]["extra"], 1);
        assert_eq!(merged["plugins"], json!(["x"]));
    }

    #[test]
    fn test_merge_scalar_replaces_object() {
        let default = json!({"ui": {"theme": "dark"}});
        let loaded = json!({"ui": "compact"});

        assert_eq!(merge_settings(&default, &loaded), json!({"ui": "compact"}));
    }

    #[test]
    fn test_partial_document_fills_every_default() {
        let doc = SettingsDocument::from_loaded(json!({"ai": {"temperature": 0.2}}));
        let settings = doc.typed().unwrap();

        assert_eq!(settings.ai.temperature, 0.2);
        assert_eq!(settings.ai.local_model, "qwen3");
        assert_eq!(settings.voice.wake_word, "asistent");
        assert!(!settings.is_module_enabled("web_tools"));
        assert!(settings.is_module_enabled("help"));
    }

    #[test]
    fn test_sanitized_resets_wrong_types() {
        let doc = SettingsDocument::from_loaded(json!({
            "ai": {"temperature": "0.5", "max_tokens": 1.5, "local_model": "mistral"},
            "ui": "compact",
            "modules": {"weather": "off", "pdf_reader": false},
            "extra": {"kept": true}
        }));
        assert!(doc.typed().is_err());

        let fixed = doc.sanitized();
        let settings = fixed.typed().unwrap();
        assert_eq!(settings.ai.temperature, 0.7);
        assert_eq!(settings.ai.max_tokens, 1000);
        assert_eq!(settings.ai.local_model, "mistral");
        assert_eq!(settings.ui, UiSettings::default());
        assert!(settings.is_module_enabled("weather"));
        assert!(!settings.is_module_enabled("pdf_reader"));
        assert_eq!(fixed.get(&["extra", "kept"]), Some(&json!(true)));
    }

    #[test]
    fn test_sanitized_leaves_valid_document_alone() {
        let doc = SettingsDocument::from_loaded(json!({"ai": {"temperature": 0.2}}));
        assert_eq!(doc.sanitized(), doc);
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = SettingsDocument::defaults();
        doc.set(&["modules", "weather"], json!(false));
        doc.set(&["new", "nested", "key"], json!("v"));

        assert_eq!(doc.get(&["modules", "weather"]), Some(&json!(false)));
        assert_eq!(doc.get(&["new", "nested", "key"]), Some(&json!("v")));
        assert_eq!(doc.get(&["modules", "file_manager"]), Some(&json!(true)));
    }
}
