//! Built-in handler modules.
//!
//! Each module exposes an `ID` and a `build` constructor used by the static
//! table in [`crate::registry`].

pub mod code_analyzer;
pub mod file_manager;
pub mod help;
pub mod pdf_reader;
pub mod system_tools;
pub mod weather;
pub mod web_tools;

use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Words following `phrase` in `command`, matched word by word and
/// case-insensitively. `None` when the phrase does not occur.
pub(crate) fn args_after<'a>(command: &'a str, phrase: &str) -> Option<Vec<&'a str>> {
    let words: Vec<&str> = command.split_whitespace().collect();
    let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let phrase_words: Vec<String> = phrase.split_whitespace().map(|w| w.to_lowercase()).collect();
    if phrase_words.is_empty() || phrase_words.len() > words.len() {
        return None;
    }

    (0..=words.len() - phrase_words.len())
        .find(|&start| lowered[start..start + phrase_words.len()] == phrase_words[..])
        .map(|start| words[start + phrase_words.len()..].to_vec())
}

/// Arguments after the first of `phrases` found in `command`.
pub(crate) fn args_after_any<'a>(command: &'a str, phrases: &[&str]) -> Vec<&'a str> {
    phrases
        .iter()
        .find_map(|p| args_after(command, p))
        .unwrap_or_default()
}

/// Resolve a plain file name inside `base`, refusing anything that would
/// escape it.
pub(crate) fn child_path(base: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim_matches(|c| c == '"' || c == '\'');
    let candidate = Path::new(name);
    let plain = !name.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !plain {
        bail!("neplatný názov '{}'", name);
    }
    Ok(base.join(candidate))
}

pub(crate) fn human_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KB", b / KIB)
    } else if b < KIB * KIB * KIB {
        format!("{:.1} MB", b / (KIB * KIB))
    } else {
        format!("{:.1} GB", b / (KIB * KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_after() {
        assert_eq!(
            args_after("Vytvor Zložku Projekty 2024", "vytvor zložku"),
            Some(vec!["Projekty", "2024"])
        );
        assert_eq!(args_after("vytvor zložku", "vytvor zložku"), Some(vec![]));
        assert_eq!(args_after("zmaž súbor", "vytvor zložku"), None);
    }

    #[test]
    fn test_child_path_rejects_escapes() {
        let base = Path::new("/tmp/base");
        assert_eq!(child_path(base, "a.txt").unwrap(), base.join("a.txt"));
        assert!(child_path(base, "../etc").is_err());
        assert!(child_path(base, "/etc/passwd").is_err());
        assert!(child_path(base, "").is_err());
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }
}
