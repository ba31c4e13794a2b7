//! Aura - Slovak command assistant, terminal front end.

use std::path::{Path, PathBuf};

use agent_host::registry::BUILTIN_MODULES;
use agent_host::{build_router, spawn, AssistantHandle, HandlerEnv};
use anyhow::{Context, Result};
use services::config_store::ConfigStore;
use shared::handler::ModuleCatalog;
use shared::settings::AppSettings;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::MetaCommand;

/// The running assistant plus what the terminal needs to describe it.
struct Session {
    handle: AssistantHandle,
    task: JoinHandle<()>,
    catalog: ModuleCatalog,
}

impl Session {
    fn start(settings: AppSettings, working_dir: PathBuf) -> Self {
        let env = HandlerEnv::new(settings, working_dir);
        let router = build_router(&env);
        let (handle, task) = spawn(router);
        Self {
            handle,
            task,
            catalog: env.catalog,
        }
    }

    async fn stop(self) {
        self.handle.shutdown().await;
        if let Err(e) = self.task.await {
            tracing::warn!("assistant task ended abnormally: {}", e);
        }
    }
}

/// Stop the running assistant and start a fresh one from the saved settings.
async fn restart(session: Session, store: &ConfigStore, working_dir: &Path) -> Session {
    session.stop().await;
    Session::start(store.load_app_settings(), working_dir.to_path_buf())
}

fn report_failure(what: &str, err: anyhow::Error) {
    tracing::warn!("{} failed: {:#}", what, err);
    println!("❌ {}: {:#}", what, err);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = ConfigStore::from_env();
    store.ensure_files()?;
    let settings = store.load_app_settings();
    let working_dir = std::env::current_dir().context("no current directory")?;
    tracing::info!(
        "config in {}, working in {}",
        store.dir().display(),
        working_dir.display()
    );

    let voice = store.load_voice_config();
    if settings.voice.enabled {
        tracing::debug!(
            "voice input unavailable in the terminal (wake word '{}', {})",
            voice.wake_word,
            voice.language
        );
    }

    let mut session = Session::start(settings, working_dir.clone());

    println!("🤖 Aura je pripravená. Napíš príkaz alebo 'koniec'.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let text = match MetaCommand::parse(&line) {
            None => line,
            Some(MetaCommand::Hotkey(command)) => command,
            Some(MetaCommand::Quit) => break,
            Some(MetaCommand::Usage(text)) => {
                println!("{}", text);
                continue;
            }
            Some(MetaCommand::ListModels) => {
                let models = store.load_models();
                let current = store.load_app_settings().ai.local_model;
                println!("🧠 Dostupné modely:");
                for m in &models.available_models {
                    let marker = if current == *m { "*" } else { " " };
                    println!(" {} {}", marker, m);
                }
                continue;
            }
            Some(MetaCommand::SwitchModel(name)) => {
                match store.set_local_model(&name) {
                    Ok(_) => {
                        session = restart(session, &store, &working_dir).await;
                        println!("✅ Lokálny model prepnutý na '{}'", name);
                    }
                    Err(e) => report_failure("Uloženie modelu", e),
                }
                continue;
            }
            Some(MetaCommand::ListModules) => {
                println!("🔮 Načítané moduly:");
                for m in session.catalog.read().iter() {
                    println!(" - {} ({}): {}", m.name, m.id, m.description);
                }
                continue;
            }
            Some(MetaCommand::SetModule { id, enabled }) => {
                match store.set_module_enabled(&id, enabled) {
                    Ok(_) => {
                        session = restart(session, &store, &working_dir).await;
                        let state = if enabled { "zapnutý" } else { "vypnutý" };
                        println!("✅ Modul '{}' je {}", id, state);
                    }
                    Err(e) => report_failure("Uloženie nastavení", e),
                }
                continue;
            }
            Some(MetaCommand::UnknownModule(id)) => {
                let known: Vec<&str> = BUILTIN_MODULES.iter().map(|m| m.id).collect();
                println!("❌ Neznámy modul '{}'. Dostupné: {}", id, known.join(", "));
                continue;
            }
            Some(MetaCommand::RepairSettings) => {
                match store.repair_settings() {
                    Ok(_) => {
                        session = restart(session, &store, &working_dir).await;
                        println!("✅ Nastavenia boli opravené");
                    }
                    Err(e) => report_failure("Oprava nastavení", e),
                }
                continue;
            }
        };

        let response = session.handle.send(text).await?;
        tracing::debug!("response #{} from {:?}", response.seq, response.source);
        println!("{}\n", response.text);
    }

    session.stop().await;
    println!("👋 Dovidenia!");
    Ok(())
}
