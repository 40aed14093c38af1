use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use lexbdd_core::driver::DriverPool;
use lexbdd_core::engine::SfdcEngine;
use lexbdd_core::record::Credentials;
use lexbdd_runtime::{Session, StepError};

/// Per-scenario cucumber world.
///
/// The driver pool and engine are injected by the harness before scenarios
/// run; credentials and named values (URLs, XPaths) are registered the same
/// way and referenced from feature files by name.
#[derive(cucumber::World, Default)]
pub struct LexWorld {
    pool: Option<Arc<dyn DriverPool>>,
    engine: Option<Arc<dyn SfdcEngine>>,
    credentials: HashMap<String, Credentials>,
    values: HashMap<String, String>,
    pub(crate) session: Option<Session>,
}

impl fmt::Debug for LexWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexWorld")
            .field("has_pool", &self.pool.is_some())
            .field("has_engine", &self.engine.is_some())
            .field("credentials", &self.credentials.keys().collect::<Vec<_>>())
            .field("session", &self.session)
            .finish()
    }
}

impl LexWorld {
    pub fn set_pool(&mut self, pool: Arc<dyn DriverPool>) {
        self.pool = Some(pool);
    }

    pub fn set_engine(&mut self, engine: Arc<dyn SfdcEngine>) {
        self.engine = Some(engine);
    }

    pub fn add_credentials(&mut self, name: &str, credentials: Credentials) {
        self.credentials.insert(name.to_owned(), credentials);
    }

    /// Registers a named value; steps resolve names through [`Self::resolve`]
    /// so feature files can reference configured URLs/XPaths symbolically.
    pub fn add_value(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_owned(), value.to_owned());
    }

    /// Looks the key up in the value registry, falling back to the literal.
    pub(crate) fn resolve(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| key.to_owned())
    }

    pub(crate) fn credentials_named(&self, name: &str) -> Result<Credentials, StepError> {
        self.credentials
            .get(name)
            .cloned()
            .ok_or_else(|| StepError::Fixture(format!("unknown credential '{name}'")))
    }

    /// Harness wiring is a precondition, not a scenario outcome; a missing
    /// pool/engine panics instead of failing the step.
    pub(crate) fn pool(&self) -> &dyn DriverPool {
        self.pool.as_deref().expect("no driver pool injected; wire one in a before hook")
    }

    pub(crate) fn engine_arc(&self) -> Arc<dyn SfdcEngine> {
        Arc::clone(self.engine.as_ref().expect("no engine injected; wire one in a before hook"))
    }

    pub(crate) fn session(&self) -> Result<&Session, StepError> {
        self.session.as_ref().ok_or(StepError::NoSession)
    }
}
