//! Help texts built from the live module catalog.

use anyhow::Result;
use async_trait::async_trait;
use shared::handler::{contains_any, Handler, ModuleCatalog, ModuleInfo};
use std::sync::Arc;

use crate::registry::HandlerEnv;

pub const ID: &str = "help";

const GENERAL_HELP: &str = "🎯 **VŠEOBECNÁ NÁPOVEDA - AURA**

Som asistent, ktorý rozumie príkazom v slovenčine. Ak príkaz nespozná
žiadny modul, odpovie jazykový model.

**Špeciálne príkazy:**
• `pomoc` - táto nápoveda
• `príkazy` - zoznam príkazov podľa modulov
• `moduly` - prehľad načítaných modulov";

pub fn build(env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(Help::new(env.catalog.clone()))
}

pub struct Help {
    catalog: ModuleCatalog,
}

impl Help {
    pub fn new(catalog: ModuleCatalog) -> Self {
        Self { catalog }
    }

    /// Registered modules other than this one.
    fn others(&self) -> Vec<ModuleInfo> {
        self.catalog
            .read()
            .iter()
            .filter(|m| m.id != ID)
            .cloned()
            .collect()
    }

    fn modules_help(&self) -> String {
        let modules = self.others();
        if modules.is_empty() {
            return "🔮 Nie sú načítané žiadne moduly.".into();
        }
        let mut out = format!("🔮 **Načítané moduly ({}):**", modules.len());
        for m in &modules {
            out.push_str(&format!("\n• **{}** - {}", m.name, m.description));
        }
        out
    }

    fn commands_help(&self) -> String {
        let mut out = String::from("📚 **Zoznam príkazov:**");
        for m in self.others() {
            out.push_str(&format!("\n\n**{}**", m.name));
            for t in &m.triggers {
                out.push_str(&format!("\n• {}", t));
            }
        }
        out
    }
}

#[async_trait]
impl Handler for Help {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Nápoveda"
    }

    fn description(&self) -> &'static str {
        "Nápoveda, zoznam príkazov a modulov"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &[
            "pomoc",
            "help",
            "nápoveda",
            "príkazy",
            "commands",
            "zoznam príkazov",
            "list commands",
            "čo vieš",
            "what can you do",
            "moduly",
            "modules",
            "funkcie",
            "functions",
        ]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        if contains_any(command, &["modul", "module"]) {
            Ok(self.modules_help())
        } else if contains_any(command, &["príkaz", "command"]) {
            Ok(self.commands_help())
        } else {
            Ok(GENERAL_HELP.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::RwLock;

    fn help_with(modules: Vec<ModuleInfo>) -> Help {
        Help::new(Arc::new(RwLock::new(modules)))
    }

    fn info(id: &str, name: &str, triggers: &[&str]) -> ModuleInfo {
        ModuleInfo {
            id: id.into(),
            name: name.into(),
            description: format!("{} popis", name),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_general_help() {
        let out = help_with(vec![]).handle("pomoc").await.unwrap();
        assert!(out.contains("VŠEOBECNÁ NÁPOVEDA"));
    }

    #[tokio::test]
    async fn test_modules_listed_from_catalog() {
        let help = help_with(vec![
            info(ID, "Nápoveda", &["pomoc"]),
            info("weather", "Počasie", &["počasie"]),
        ]);
        let out = help.handle("aké moduly máš").await.unwrap();
        assert!(out.contains("Načítané moduly (1)"));
        assert!(out.contains("Počasie"));
        assert!(!out.contains("Nápoveda"));
    }

    #[tokio::test]
    async fn test_commands_listed_per_module() {
        let help = help_with(vec![info(
            "file_manager",
            "Správa súborov",
            &["vytvor zložku", "zmaž súbor"],
        )]);
        let out = help.handle("zoznam príkazov").await.unwrap();
        assert!(out.contains("**Správa súborov**"));
        assert!(out.contains("• zmaž súbor"));
    }
}
