//! Assistant error types.

use std::time::Duration;

/// Everything that can go wrong while answering a command.
///
/// Errors travel up as values and are turned into chat text exactly once,
/// by [`AssistantError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("module {module} failed: {source:#}")]
    Handler {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("module {module} panicked")]
    HandlerPanicked { module: String },

    #[error("module {module} timed out after {}s", .after.as_secs())]
    Timeout { module: String, after: Duration },

    #[error("language model failed: {0:#}")]
    Model(#[source] anyhow::Error),

    #[error("configuration error: {0:#}")]
    Config(#[source] anyhow::Error),

    #[error("assistant is no longer running")]
    Closed,
}

impl AssistantError {
    pub fn handler(module: impl Into<String>, source: anyhow::Error) -> Self {
        AssistantError::Handler {
            module: module.into(),
            source,
        }
    }

    /// Chat-bubble text for this error.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Handler { module, source } => {
                format!("❌ Chyba v module {}: {:#}", module, source)
            }
            AssistantError::HandlerPanicked { module } => {
                format!("❌ Modul {} neočakávane zlyhal", module)
            }
            AssistantError::Timeout { module, after } => format!(
                "❌ Modul {} neodpovedal do {} s",
                module,
                after.as_secs()
            ),
            AssistantError::Model(source) => {
                format!("❌ Chyba pri komunikácii s AI: {:#}", source)
            }
            AssistantError::Config(source) => {
                format!("❌ Chyba v nastaveniach: {:#}", source)
            }
            AssistantError::Closed => "❌ Asistent nie je spustený".to_string(),
        }
    }
}
