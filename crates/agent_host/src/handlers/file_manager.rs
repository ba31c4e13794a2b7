//! File management: create folders, list, delete and rename files.
//!
//! Every path is resolved inside the module's working directory; names with
//! separators or `..` are refused.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use services::file_scan::{list_dir, EntryKind};
use shared::handler::{contains_any, Handler};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::{args_after_any, child_path};
use crate::registry::HandlerEnv;

pub const ID: &str = "file_manager";

const CREATE: &[&str] = &["vytvor zložku", "vytvor priečinok"];
const LIST: &[&str] = &["zobraz obsah", "zoznam súborov"];
const DELETE: &[&str] = &["zmaž súbor"];
const RENAME: &[&str] = &["premenuj súbor"];

pub fn build(env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(FileManager::new(env.working_dir.clone()))
}

pub struct FileManager {
    base: PathBuf,
}

impl FileManager {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn create_folder(&self, command: &str) -> Result<String> {
        let args = args_after_any(command, CREATE);
        let Some(name) = args.first() else {
            return Ok("❌ Zadaj názov zložky: 'vytvor zložku [názov]'".into());
        };
        let path = child_path(&self.base, name)?;
        fs::create_dir_all(&path).with_context(|| format!("vytváranie {}", path.display()))?;
        Ok(format!("✅ Zložka '{}' bola úspešne vytvorená", name))
    }

    fn list_directory(&self) -> Result<String> {
        let entries = list_dir(&self.base)?;
        let mut out = format!("📂 Obsah priečinka '{}':\n", self.base.display());
        if entries.is_empty() {
            out.push_str("(prázdny)");
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|e| match e.kind {
                EntryKind::Dir => format!("📁 {}", e.name),
                EntryKind::File => format!("📄 {}", e.name),
            })
            .collect();
        out.push_str(&lines.join("\n"));
        Ok(out)
    }

    fn delete_file(&self, command: &str) -> Result<String> {
        let args = args_after_any(command, DELETE);
        let Some(name) = args.first() else {
            return Ok("❌ Zadaj názov súboru: 'zmaž súbor [názov]'".into());
        };
        let path = child_path(&self.base, name)?;
        if !path.is_file() {
            bail!("súbor '{}' neexistuje", name);
        }
        fs::remove_file(&path).with_context(|| format!("mazanie {}", path.display()))?;
        tracing::info!("deleted {}", path.display());
        Ok(format!("✅ Súbor '{}' bol úspešne vymazaný", name))
    }

    fn rename_file(&self, command: &str) -> Result<String> {
        let args = args_after_any(command, RENAME);
        let [from, to, ..] = args.as_slice() else {
            return Ok("❌ Zadaj pôvodný a nový názov: 'premenuj súbor [starý] [nový]'".into());
        };
        let source = child_path(&self.base, from)?;
        let target = child_path(&self.base, to)?;
        if !source.exists() {
            bail!("súbor '{}' neexistuje", from);
        }
        if target.exists() {
            bail!("'{}' už existuje", to);
        }
        fs::rename(&source, &target)
            .with_context(|| format!("premenovanie {} na {}", source.display(), target.display()))?;
        Ok(format!("✅ Súbor '{}' bol premenovaný na '{}'", from, to))
    }
}

#[async_trait]
impl Handler for FileManager {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Správa súborov"
    }

    fn description(&self) -> &'static str {
        "Vytváranie zložiek, výpis, mazanie a premenovanie súborov"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &[
            "vytvor zložku",
            "vytvor priečinok",
            "zmaž súbor",
            "premenuj súbor",
            "zobraz obsah priečinka",
            "zoznam súborov",
        ]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        if contains_any(command, CREATE) {
            self.create_folder(command)
        } else if contains_any(command, LIST) {
            self.list_directory()
        } else if contains_any(command, DELETE) {
            self.delete_file(command)
        } else if contains_any(command, RENAME) {
            self.rename_file(command)
        } else {
            Ok(format!(
                "ℹ️ Príkaz '{}' ešte nie je implementovaný v module Správa súborov",
                command
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (TempDir, FileManager) {
        let tmp = TempDir::new().unwrap();
        let fm = FileManager::new(tmp.path().to_path_buf());
        (tmp, fm)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (tmp, fm) = manager();
        let out = fm.handle("vytvor zložku Projekty").await.unwrap();
        assert!(out.starts_with('✅'));
        assert!(tmp.path().join("Projekty").is_dir());

        fs::write(tmp.path().join("poznamky.txt"), "x").unwrap();
        let listing = fm.handle("zoznam súborov").await.unwrap();
        assert!(listing.contains("📁 Projekty"));
        assert!(listing.contains("📄 poznamky.txt"));
    }

    #[tokio::test]
    async fn test_create_without_name_gives_usage() {
        let (_tmp, fm) = manager();
        let out = fm.handle("vytvor priečinok").await.unwrap();
        assert!(out.starts_with('❌'));
        assert!(out.contains("vytvor zložku [názov]"));

        let out = fm.handle("zmaž súbor").await.unwrap();
        assert!(out.starts_with("❌ Zadaj názov súboru"));

        let out = fm.handle("premenuj súbor iba_jeden.txt").await.unwrap();
        assert!(out.starts_with('❌'));
    }

    #[tokio::test]
    async fn test_delete_file() {
        let (tmp, fm) = manager();
        fs::write(tmp.path().join("stary.log"), "x").unwrap();

        fm.handle("zmaž súbor stary.log").await.unwrap();
        assert!(!tmp.path().join("stary.log").exists());

        assert!(fm.handle("zmaž súbor stary.log").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_refuses_escape() {
        let (_tmp, fm) = manager();
        assert!(fm.handle("zmaž súbor ../niečo").await.is_err());
    }

    #[tokio::test]
    async fn test_rename_file() {
        let (tmp, fm) = manager();
        fs::write(tmp.path().join("a.txt"), "x").unwrap();

        let out = fm.handle("premenuj súbor a.txt b.txt").await.unwrap();
        assert!(out.contains("b.txt"));
        assert!(tmp.path().join("b.txt").exists());
        assert!(!tmp.path().join("a.txt").exists());
    }
}
