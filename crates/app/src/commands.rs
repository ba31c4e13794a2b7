//! Terminal meta commands, handled before anything reaches the assistant.

use agent_host::registry::is_builtin;
use agent_host::Hotkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Quit,
    /// Forwarded to the assistant as a hotkey command
    Hotkey(String),
    ListModels,
    SwitchModel(String),
    ListModules,
    SetModule { id: String, enabled: bool },
    /// `/zapni` or `/vypni` with an id no built-in module has
    UnknownModule(String),
    RepairSettings,
    /// A meta command with missing or unknown arguments
    Usage(&'static str),
}

pub const USAGE: &str = "Príkazy terminálu:
  koniec | exit      ukončí asistenta
  !stop !cancel !help  hlasové hotkeys
  /modely            dostupné modely
  /model <názov>     prepne lokálny model
  /moduly            načítané moduly
  /zapni <modul>     zapne modul
  /vypni <modul>     vypne modul
  /oprav             opraví settings.json";

impl MetaCommand {
    /// `None` means the line is an ordinary command for the assistant.
    pub fn parse(line: &str) -> Option<MetaCommand> {
        let line = line.trim();
        let lowered = line.to_lowercase();
        if lowered == "koniec" || lowered == "exit" {
            return Some(MetaCommand::Quit);
        }

        if let Some(action) = line.strip_prefix('!') {
            return Some(match action {
                "stop" | "cancel" | "help" => MetaCommand::Hotkey(Hotkey::command(action)),
                _ => MetaCommand::Usage(USAGE),
            });
        }

        let rest = line.strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let command = parts.next().unwrap_or_default();
        Some(match command {
            "modely" => MetaCommand::ListModels,
            "model" => match parts.next() {
                Some(name) => MetaCommand::SwitchModel(name.to_string()),
                None => MetaCommand::Usage("Použitie: /model <názov>"),
            },
            "moduly" => MetaCommand::ListModules,
            "zapni" | "vypni" => match parts.next() {
                Some(id) if is_builtin(id) => MetaCommand::SetModule {
                    id: id.to_string(),
                    enabled: command == "zapni",
                },
                Some(id) => MetaCommand::UnknownModule(id.to_string()),
                None => MetaCommand::Usage("Použitie: /zapni <modul> alebo /vypni <modul>"),
            },
            "oprav" => MetaCommand::RepairSettings,
            _ => MetaCommand::Usage(USAGE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_meta() {
        assert_eq!(MetaCommand::parse("aké je počasie"), None);
        assert_eq!(MetaCommand::parse("koniec týždňa"), None);
    }

    #[test]
    fn test_quit() {
        assert_eq!(MetaCommand::parse(" Koniec "), Some(MetaCommand::Quit));
        assert_eq!(MetaCommand::parse("exit"), Some(MetaCommand::Quit));
    }

    #[test]
    fn test_hotkeys() {
        assert_eq!(
            MetaCommand::parse("!stop"),
            Some(MetaCommand::Hotkey("🔧 HOTKEY:stop".into()))
        );
        assert_eq!(MetaCommand::parse("!louder"), Some(MetaCommand::Usage(USAGE)));
    }

    #[test]
    fn test_model_switch() {
        assert_eq!(
            MetaCommand::parse("/model mistral"),
            Some(MetaCommand::SwitchModel("mistral".into()))
        );
        assert!(matches!(
            MetaCommand::parse("/model"),
            Some(MetaCommand::Usage(_))
        ));
        assert_eq!(MetaCommand::parse("/modely"), Some(MetaCommand::ListModels));
        assert_eq!(MetaCommand::parse("/oprav"), Some(MetaCommand::RepairSettings));
    }

    #[test]
    fn test_module_toggle() {
        assert_eq!(
            MetaCommand::parse("/vypni weather"),
            Some(MetaCommand::SetModule {
                id: "weather".into(),
                enabled: false
            })
        );
        assert!(matches!(
            MetaCommand::parse("/zapni"),
            Some(MetaCommand::Usage(_))
        ));
    }

    #[test]
    fn test_module_toggle_rejects_unknown_id() {
        assert_eq!(
            MetaCommand::parse("/vypni wether"),
            Some(MetaCommand::UnknownModule("wether".into()))
        );
    }
}
