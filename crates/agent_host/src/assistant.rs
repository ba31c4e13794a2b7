//! The assistant task. It owns the router, which holds the module registry
//! and the conversation context. Callers talk to it through an
//! [`AssistantHandle`].

use std::sync::Arc;
use std::time::Duration;

use providers::ProviderRouter;
use shared::error::AssistantError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::context::ConversationContext;
use crate::hotkey::AssistantEvent;
use crate::registry::{init_registry, HandlerEnv};
use crate::router::{CommandRouter, Response};

const REQUEST_QUEUE: usize = 32;
const EVENT_QUEUE: usize = 16;

/// Lower bound for `assistant.handler_timeout_secs`.
pub const MIN_HANDLER_TIMEOUT_SECS: u64 = 1;

enum Request {
    Command {
        text: String,
        reply: oneshot::Sender<Response>,
    },
    Context {
        reply: oneshot::Sender<ConversationContext>,
    },
    Shutdown,
}

/// Cheap to clone; every clone feeds the same assistant task.
#[derive(Clone)]
pub struct AssistantHandle {
    requests: mpsc::Sender<Request>,
    events: broadcast::Sender<AssistantEvent>,
}

/// Build the full router: enabled modules plus the configured language
/// models. The registry fills `env.catalog`.
pub fn build_router(env: &HandlerEnv) -> CommandRouter {
    let registry = init_registry(env);
    tracing::info!("{} modules registered", registry.len());

    let settings = &env.settings;
    let model = Arc::new(ProviderRouter::new(settings.ai.clone()));
    let timeout_secs = settings
        .assistant
        .handler_timeout_secs
        .max(MIN_HANDLER_TIMEOUT_SECS);
    CommandRouter::new(registry, model).with_handler_timeout(Duration::from_secs(timeout_secs))
}

/// Start the assistant task. Commands are processed one at a time in the
/// order they were sent.
pub fn spawn(router: CommandRouter) -> (AssistantHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Request>(REQUEST_QUEUE);
    let (events, _) = broadcast::channel(EVENT_QUEUE);
    let mut router = router.with_events(events.clone());

    let task = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            match request {
                Request::Command { text, reply } => {
                    let response = router.process(&text).await;
                    if reply.send(response).is_err() {
                        tracing::debug!("caller went away before the response");
                    }
                }
                Request::Context { reply } => {
                    let _ = reply.send(router.context().clone());
                }
                Request::Shutdown => break,
            }
        }
        tracing::info!("assistant stopped");
    });

    (
        AssistantHandle {
            requests: tx,
            events,
        },
        task,
    )
}

impl AssistantHandle {
    pub async fn send(&self, text: impl Into<String>) -> Result<Response, AssistantError> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(Request::Command {
                text: text.into(),
                reply,
            })
            .await
            .map_err(|_| AssistantError::Closed)?;
        rx.await.map_err(|_| AssistantError::Closed)
    }

    pub async fn context_snapshot(&self) -> Result<ConversationContext, AssistantError> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(Request::Context { reply })
            .await
            .map_err(|_| AssistantError::Closed)?;
        rx.await.map_err(|_| AssistantError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.events.subscribe()
    }

    pub async fn shutdown(&self) {
        let _ = self.requests.send(Request::Shutdown).await;
    }
}
