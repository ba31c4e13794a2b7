//! Handler module types.
//!
//! A handler module owns a list of trigger phrases and turns a matching
//! command into a text response. The router asks each registered module in
//! order and the first one that matches handles the command.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Core trait every handler module implements
#[async_trait]
pub trait Handler: Send + Sync {
    /// Unique module identifier (snake_case), also the settings flag key
    fn id(&self) -> &'static str;

    /// Human-readable display name
    fn name(&self) -> &'static str;

    /// One-line description shown in help output
    fn description(&self) -> &'static str;

    /// Lower-case trigger phrases
    fn triggers(&self) -> &'static [&'static str];

    /// Whether this module wants the command.
    fn can_handle(&self, command: &str) -> bool {
        contains_any(command, self.triggers())
    }

    /// Produce the response for a command this module accepted
    async fn handle(&self, command: &str) -> anyhow::Result<String>;
}

/// Case-insensitive substring test against a list of lower-case phrases.
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|phrase| lower.contains(phrase))
}

/// Module metadata for help and listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub triggers: Vec<String>,
}

impl ModuleInfo {
    pub fn of(handler: &dyn Handler) -> Self {
        Self {
            id: handler.id().to_string(),
            name: handler.name().to_string(),
            description: handler.description().to_string(),
            triggers: handler.triggers().iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Shared, read-mostly list of registered modules.
pub type ModuleCatalog = Arc<RwLock<Vec<ModuleInfo>>>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeter;

    #[async_trait]
    impl Handler for Greeter {
        fn id(&self) -> &'static str {
            "greeter"
        }
        fn name(&self) -> &'static str {
            "Greeter"
        }
        fn description(&self) -> &'static str {
            "Says hello"
        }
        fn triggers(&self) -> &'static [&'static str] {
            &["ahoj", "dobrý deň"]
        }
        async fn handle(&self, _command: &str) -> anyhow::Result<String> {
            Ok("Ahoj!".into())
        }
    }

    #[test]
    fn test_can_handle_is_case_insensitive() {
        assert!(Greeter.can_handle("AHOJ svet"));
        assert!(Greeter.can_handle("Dobrý Deň, asistent"));
        assert!(!Greeter.can_handle("zbohom"));
    }

    #[test]
    fn test_module_info_snapshot() {
        let info = ModuleInfo::of(&Greeter);
        assert_eq!(info.id, "greeter");
        assert_eq!(info.triggers, vec!["ahoj", "dobrý deň"]);
    }
}
