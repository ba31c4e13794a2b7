//! Voice hotkeys delivered as specially prefixed commands.

use serde::{Deserialize, Serialize};

pub const HOTKEY_PREFIX: &str = "🔧 HOTKEY:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hotkey {
    Stop,
    Cancel,
    Help,
    Unknown(String),
}

impl Hotkey {
    /// `None` when `command` is not a hotkey at all.
    pub fn parse(command: &str) -> Option<Hotkey> {
        let action = command.strip_prefix(HOTKEY_PREFIX)?.trim();
        Some(match action {
            "stop" => Hotkey::Stop,
            "cancel" => Hotkey::Cancel,
            "help" => Hotkey::Help,
            other => Hotkey::Unknown(other.to_string()),
        })
    }

    pub fn command(action: &str) -> String {
        format!("{}{}", HOTKEY_PREFIX, action)
    }
}

/// Notifications for a speech front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistantEvent {
    StopSpeaking,
    CancelListening,
}

pub const VOICE_HELP: &str = "🎙️ **Hlasové príkazy:**
- \"Zastav\" - zastaví prehováranie
- \"Zruš\" - zruší počúvanie
- \"Pomoc\" - zobrazí túto nápovedu
- \"Asistent\" - wake-word pre aktiváciu";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Hotkey::parse("🔧 HOTKEY: stop"), Some(Hotkey::Stop));
        assert_eq!(Hotkey::parse(&Hotkey::command("cancel")), Some(Hotkey::Cancel));
        assert_eq!(
            Hotkey::parse("🔧 HOTKEY:louder"),
            Some(Hotkey::Unknown("louder".into()))
        );
        assert_eq!(Hotkey::parse("stop"), None);
    }
}
