pub mod error;
pub mod handler;
pub mod settings;

pub mod agent_api {
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: String, // "system" | "user" | "assistant"
        pub content: String,
    }

    impl ChatMessage {
        pub fn system(content: impl Into<String>) -> Self {
            Self {
                role: "system".to_string(),
                content: content.into(),
            }
        }

        pub fn user(content: impl Into<String>) -> Self {
            Self {
                role: "user".to_string(),
                content: content.into(),
            }
        }
    }

    /// A single request/response chat completion backend.
    #[async_trait]
    pub trait ChatModel: Send + Sync {
        async fn generate(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String>;
    }
}
