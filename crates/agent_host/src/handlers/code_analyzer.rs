//! Source file overview for the working directory.

use anyhow::Result;
use async_trait::async_trait;
use services::file_scan::{count_lines, files_with_extensions};
use shared::handler::{contains_any, Handler};
use std::path::PathBuf;
use std::sync::Arc;

use crate::registry::HandlerEnv;

pub const ID: &str = "code_analyzer";

const SOURCE_EXTENSIONS: &[&str] = &["py", "rs", "js", "ts", "java", "c", "cpp", "go"];

pub fn build(env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(CodeAnalyzer::new(env.working_dir.clone()))
}

pub struct CodeAnalyzer {
    base: PathBuf,
}

impl CodeAnalyzer {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn analyze(&self) -> Result<String> {
        let mut files = files_with_extensions(&self.base, SOURCE_EXTENSIONS)?;
        if files.is_empty() {
            return Ok("📁 V aktuálnom priečinku nie sú žiadne zdrojové súbory na analýzu.".into());
        }
        for f in &mut files {
            f.lines = count_lines(&f.path);
        }

        let total_lines: usize = files.iter().filter_map(|f| f.lines).sum();
        let mut out = format!(
            "📊 **Analýza zdrojových súborov v '{}':**\n- Nájdených {} súborov, spolu {} riadkov",
            self.base.display(),
            files.len(),
            total_lines
        );
        for f in &files {
            let lines = f
                .lines
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".into());
            out.push_str(&format!(
                "\n  - {}: {} riadkov, {} bajtov",
                f.name, lines, f.size_bytes
            ));
        }
        Ok(out)
    }
}

#[async_trait]
impl Handler for CodeAnalyzer {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Analýza kódu"
    }

    fn description(&self) -> &'static str {
        "Prehľad zdrojových súborov v pracovnom priečinku"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &[
            "analyzuj kód",
            "skontroluj kód",
            "optimalizuj kód",
            "code analysis",
        ]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        if contains_any(command, &["analyzuj kód", "skontroluj kód", "code analysis"]) {
            self.analyze()
        } else if contains_any(command, &["optimalizuj kód"]) {
            Ok("🔧 Optimalizácia kódu bude dostupná čoskoro...".into())
        } else {
            Ok(format!(
                "ℹ️ Príkaz '{}' ešte nie je implementovaný v module Analýza kódu",
                command
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_analyze_counts_lines() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "import os\n\nprint(os.getcwd())\n").unwrap();
        fs::write(tmp.path().join("lib.rs"), "fn main() {}\n").unwrap();
        fs::write(tmp.path().join("README.md"), "# x\n").unwrap();

        let analyzer = CodeAnalyzer::new(tmp.path().to_path_buf());
        let out = analyzer.handle("Analyzuj kód prosím").await.unwrap();

        assert!(out.contains("Nájdených 2 súborov, spolu 4 riadkov"));
        assert!(out.contains("main.py: 3 riadkov"));
        assert!(!out.contains("README.md"));
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let analyzer = CodeAnalyzer::new(tmp.path().to_path_buf());
        let out = analyzer.handle("skontroluj kód").await.unwrap();
        assert!(out.starts_with("📁"));
    }
}
