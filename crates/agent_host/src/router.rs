//! Command router: hotkeys, then the first matching module, then the
//! language model.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use shared::agent_api::ChatModel;
use shared::error::AssistantError;
use tokio::sync::broadcast;

use crate::context::ConversationContext;
use crate::hotkey::{AssistantEvent, Hotkey, VOICE_HELP};
use crate::prompts;
use crate::registry::ModuleRegistry;

pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Who produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseSource {
    Module(String),
    Model,
    Hotkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ResponseSource,
}

/// What the user sees for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub seq: u64,
    pub text: String,
    pub source: ResponseSource,
    pub is_error: bool,
}

pub struct CommandRouter {
    registry: ModuleRegistry,
    model: Arc<dyn ChatModel>,
    context: ConversationContext,
    handler_timeout: Duration,
    events: Option<broadcast::Sender<AssistantEvent>>,
    seq: u64,
}

impl CommandRouter {
    pub fn new(registry: ModuleRegistry, model: Arc<dyn ChatModel>) -> Self {
        Self {
            registry,
            model,
            context: ConversationContext::new(),
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
            events: None,
            seq: 0,
        }
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Hotkey side effects are published here.
    pub fn with_events(mut self, events: broadcast::Sender<AssistantEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn handler_timeout(&self) -> Duration {
        self.handler_timeout
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Answer one command, leaving errors as values.
    pub async fn dispatch(&mut self, text: &str) -> Result<Reply, AssistantError> {
        if let Some(hotkey) = Hotkey::parse(text) {
            return Ok(Reply {
                text: self.hotkey(hotkey),
                source: ResponseSource::Hotkey,
            });
        }

        if let Some(handler) = self.registry.first_match(text).cloned() {
            let module = handler.id();
            tracing::info!("dispatching to module {}", module);

            let call = AssertUnwindSafe(handler.handle(text)).catch_unwind();
            let outcome = tokio::time::timeout(self.handler_timeout, call)
                .await
                .map_err(|_| AssistantError::Timeout {
                    module: module.to_string(),
                    after: self.handler_timeout,
                })?
                .map_err(|_| AssistantError::HandlerPanicked {
                    module: module.to_string(),
                })?;

            return outcome
                .map(|text| Reply {
                    text,
                    source: ResponseSource::Module(module.to_string()),
                })
                .map_err(|e| AssistantError::handler(module, e));
        }

        tracing::info!("no module matched, asking the model");
        let messages = prompts::fallback_messages(text, &self.context.summary());
        let text = self
            .model
            .generate(messages)
            .await
            .map_err(AssistantError::Model)?;
        Ok(Reply {
            text,
            source: ResponseSource::Model,
        })
    }

    /// Dispatch, render errors for the user and remember the exchange.
    pub async fn process(&mut self, text: &str) -> Response {
        let (reply, is_error) = match self.dispatch(text).await {
            Ok(reply) => (reply, false),
            Err(err) => {
                tracing::warn!("command failed: {}", err);
                let source = match &err {
                    AssistantError::Handler { module, .. }
                    | AssistantError::HandlerPanicked { module }
                    | AssistantError::Timeout { module, .. } => {
                        ResponseSource::Module(module.clone())
                    }
                    _ => ResponseSource::Model,
                };
                let reply = Reply {
                    text: err.user_message(),
                    source,
                };
                (reply, true)
            }
        };

        if reply.source != ResponseSource::Hotkey {
            self.context.record(text, reply.text.as_str());
        }

        self.seq += 1;
        Response {
            seq: self.seq,
            text: reply.text,
            source: reply.source,
            is_error,
        }
    }

    fn hotkey(&self, hotkey: Hotkey) -> String {
        let publish = |event| {
            if let Some(events) = &self.events {
                // no subscribers is fine
                let _ = events.send(event);
            }
        };

        match hotkey {
            Hotkey::Stop => {
                publish(AssistantEvent::StopSpeaking);
                "🔇 Prehováranie zastavené".into()
            }
            Hotkey::Cancel => {
                publish(AssistantEvent::CancelListening);
                "🔇 Počúvanie zrušené".into()
            }
            Hotkey::Help => VOICE_HELP.into(),
            Hotkey::Unknown(action) => format!("ℹ️ Neznámy hotkey: {}", action),
        }
    }
}
