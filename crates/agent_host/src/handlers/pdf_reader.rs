//! Lists PDF documents in the working directory.

use anyhow::Result;
use async_trait::async_trait;
use services::file_scan::files_with_extensions;
use shared::handler::{contains_any, Handler};
use std::path::PathBuf;
use std::sync::Arc;

use super::human_size;
use crate::registry::HandlerEnv;

pub const ID: &str = "pdf_reader";

pub fn build(env: &HandlerEnv) -> Arc<dyn Handler> {
    Arc::new(PdfReader::new(env.working_dir.clone()))
}

pub struct PdfReader {
    base: PathBuf,
}

impl PdfReader {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn find_pdf_files(&self) -> Result<String> {
        let pdfs = files_with_extensions(&self.base, &["pdf"])?;
        if pdfs.is_empty() {
            return Ok("📁 V aktuálnom priečinku nie sú žiadne PDF súbory.".into());
        }
        let mut out = format!("📄 **PDF súbory v '{}':**", self.base.display());
        for pdf in &pdfs {
            out.push_str(&format!("\n- {} ({})", pdf.name, human_size(pdf.size_bytes)));
        }
        Ok(out)
    }
}

#[async_trait]
impl Handler for PdfReader {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "PDF dokumenty"
    }

    fn description(&self) -> &'static str {
        "Vyhľadanie PDF súborov v pracovnom priečinku"
    }

    fn triggers(&self) -> &'static [&'static str] {
        &["čítaj pdf", "otvor pdf", "analyzuj pdf", "pdf informácie"]
    }

    async fn handle(&self, command: &str) -> Result<String> {
        if contains_any(command, &["čítaj pdf", "otvor pdf", "pdf informácie"]) {
            self.find_pdf_files()
        } else {
            Ok("🔧 Analýza obsahu PDF zatiaľ nie je dostupná.".into())
        }
    }
}
