//! Agent Host - the assistant core
//!
//! This crate provides:
//! - Handler modules answering Slovak commands (files, system, web, code, weather, PDF)
//! - The ordered module registry and first-match command routing
//! - Language model fallback with conversation context
//! - Voice hotkeys and the single-owner assistant task

pub mod assistant;
pub mod context;
pub mod handlers;
pub mod hotkey;
pub mod prompts;
pub mod registry;
pub mod router;

pub use assistant::{build_router, spawn, AssistantHandle};
pub use context::{ConversationContext, Exchange, Intent};
pub use hotkey::{AssistantEvent, Hotkey};
pub use registry::{init_registry, HandlerEnv, ModuleRegistry};
pub use router::{CommandRouter, Reply, Response, ResponseSource};
