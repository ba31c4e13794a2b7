//! Module registry: the ordered list of handler modules the router scans.
//!
//! Built-in modules come from a static table; there is no discovery at
//! runtime. Registration order decides precedence when trigger phrases of
//! two modules overlap.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use shared::handler::{Handler, ModuleCatalog, ModuleInfo};
use shared::settings::AppSettings;

use crate::handlers;

/// What a module constructor gets to work with
#[derive(Clone)]
pub struct HandlerEnv {
    pub settings: AppSettings,
    /// Base directory for file, code and PDF commands
    pub working_dir: PathBuf,
    pub catalog: ModuleCatalog,
}

impl HandlerEnv {
    pub fn new(settings: AppSettings, working_dir: PathBuf) -> Self {
        Self {
            settings,
            working_dir,
            catalog: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

pub struct BuiltinModule {
    pub id: &'static str,
    pub build: fn(&HandlerEnv) -> Arc<dyn Handler>,
}

/// Built-in modules in registration order.
pub const BUILTIN_MODULES: &[BuiltinModule] = &[
    BuiltinModule {
        id: handlers::help::ID,
        build: handlers::help::build,
    },
    BuiltinModule {
        id: handlers::file_manager::ID,
        build: handlers::file_manager::build,
    },
    BuiltinModule {
        id: handlers::system_tools::ID,
        build: handlers::system_tools::build,
    },
    BuiltinModule {
        id: handlers::web_tools::ID,
        build: handlers::web_tools::build,
    },
    BuiltinModule {
        id: handlers::code_analyzer::ID,
        build: handlers::code_analyzer::build,
    },
    BuiltinModule {
        id: handlers::weather::ID,
        build: handlers::weather::build,
    },
    BuiltinModule {
        id: handlers::pdf_reader::ID,
        build: handlers::pdf_reader::build,
    },
];

/// Whether `module_id` names a built-in module.
pub fn is_builtin(module_id: &str) -> bool {
    BUILTIN_MODULES.iter().any(|m| m.id == module_id)
}

/// Registry keeping modules in registration order
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Handler>>,
    catalog: ModuleCatalog,
}

impl ModuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(RwLock::new(Vec::new())))
    }

    pub fn with_catalog(catalog: ModuleCatalog) -> Self {
        Self {
            modules: Vec::new(),
            catalog,
        }
    }

    /// Append a module. A module with the same id is replaced in place.
    pub fn register(&mut self, module: Arc<dyn Handler>) {
        let info = ModuleInfo::of(module.as_ref());
        let mut catalog = self.catalog.write();

        match self.modules.iter().position(|m| m.id() == module.id()) {
            Some(idx) => {
                self.modules[idx] = module;
                if let Some(slot) = catalog.iter_mut().find(|i| i.id == info.id) {
                    *slot = info;
                }
            }
            None => {
                self.modules.push(module);
                catalog.push(info);
            }
        }
    }

    pub fn get(&self, module_id: &str) -> Option<&Arc<dyn Handler>> {
        self.modules.iter().find(|m| m.id() == module_id)
    }

    /// The earliest-registered module that accepts `command`.
    pub fn first_match(&self, command: &str) -> Option<&Arc<dyn Handler>> {
        self.modules.iter().find(|m| m.can_handle(command))
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Handler>> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn infos(&self) -> Vec<ModuleInfo> {
        self.catalog.read().clone()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Register every built-in module whose settings flag is on.
pub fn init_registry(env: &HandlerEnv) -> ModuleRegistry {
    let mut registry = ModuleRegistry::with_catalog(env.catalog.clone());

    for builtin in BUILTIN_MODULES {
        if !env.settings.is_module_enabled(builtin.id) {
            tracing::info!("module {} disabled in settings", builtin.id);
            continue;
        }
        registry.register((builtin.build)(env));
        tracing::debug!("module {} registered", builtin.id);
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct Named(&'static str, &'static [&'static str]);

    #[async_trait]
    impl Handler for Named {
        fn id(&self) -> &'static str {
            self.0
        }
        fn name(&self) -> &'static str {
            self.0
        }
        fn description(&self) -> &'static str {
            "test module"
        }
        fn triggers(&self) -> &'static [&'static str] {
            self.1
        }
        async fn handle(&self, _command: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_first_match_follows_registration_order() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Named("first", &["disk"])));
        registry.register(Arc::new(Named("second", &["disk", "sieť"])));

        assert_eq!(registry.first_match("voľný DISK").unwrap().id(), "first");
        assert_eq!(registry.first_match("sieť").unwrap().id(), "second");
        assert!(registry.first_match("nič").is_none());
    }

    #[test]
    fn test_register_replaces_same_id_in_place() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Named("a", &["x"])));
        registry.register(Arc::new(Named("b", &["y"])));
        registry.register(Arc::new(Named("a", &["z"])));

        let ids: Vec<_> = registry.all().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(registry.infos()[0].triggers, vec!["z"]);
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin("weather"));
        assert!(is_builtin("web_tools"));
        assert!(!is_builtin("wether"));
        assert!(!is_builtin("Weather"));
    }

    #[test]
    fn test_init_registry_respects_flags() {
        let tmp = TempDir::new().unwrap();
        let env = HandlerEnv::new(AppSettings::default(), tmp.path().to_path_buf());
        let registry = init_registry(&env);

        // web_tools is off by default
        assert!(registry.get("web_tools").is_none());
        assert!(registry.get("file_manager").is_some());

        let ids: Vec<_> = registry.all().map(|m| m.id()).collect();
        assert_eq!(
            ids,
            vec![
                "help",
                "file_manager",
                "system_tools",
                "code_analyzer",
                "weather",
                "pdf_reader"
            ]
        );
        assert_eq!(env.catalog.read().len(), ids.len());
    }
}
