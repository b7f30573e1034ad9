//! Worker environment
//!
//! Holds the named bindings and plain-text vars a worker can reach. Built
//! once at startup and shared by every request.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Error, Fetcher, Result};

/// Name of the static asset binding
pub const ASSETS_BINDING: &str = "ASSETS";

#[derive(Clone)]
pub struct Env {
    bindings: HashMap<String, Arc<dyn Fetcher>>,
    vars: HashMap<String, String>,
    /// Binding `assets()` resolves through
    assets_binding: String,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            vars: HashMap::new(),
            assets_binding: ASSETS_BINDING.to_string(),
        }
    }
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the static asset fetcher under `name` and make it the one
    /// `assets()` returns
    #[must_use]
    pub fn with_assets(self, name: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        let name = name.into();
        let mut env = self.with_binding(name.clone(), fetcher);
        env.assets_binding = name;
        env
    }

    /// Register a fetcher under `name`, replacing any previous one
    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        self.bindings.insert(name.into(), fetcher);
        self
    }

    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn fetcher(&self, name: &str) -> Result<Arc<dyn Fetcher>> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| Error::BindingNotFound(name.to_string()))
    }

    pub fn assets(&self) -> Result<Arc<dyn Fetcher>> {
        self.fetcher(&self.assets_binding)
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("vars", &self.vars)
            .field("assets_binding", &self.assets_binding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{Request, Response};
    use async_trait::async_trait;

    struct Nothing;

    #[async_trait]
    impl Fetcher for Nothing {
        async fn fetch(&self, _req: Request) -> Result<Response> {
            Err(Error::Fetch("nothing here".to_string()))
        }
    }

    #[test]
    fn test_missing_binding() {
        let env = Env::new();
        match env.assets() {
            Err(Error::BindingNotFound(name)) => assert_eq!(name, "ASSETS"),
            other => panic!("Expected BindingNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_binding_lookup() {
        let env = Env::new().with_binding(ASSETS_BINDING, Arc::new(Nothing));
        assert!(env.assets().is_ok());
        assert!(env.fetcher("OTHER").is_err());
    }

    #[test]
    fn test_renamed_assets_binding() {
        let env = Env::new().with_assets("STATIC", Arc::new(Nothing));
        assert!(env.assets().is_ok());
        assert!(env.fetcher("STATIC").is_ok());
        assert!(env.fetcher(ASSETS_BINDING).is_err());

        // A plain binding with another name does not rename the assets one
        match Env::new().with_binding("STATIC", Arc::new(Nothing)).assets() {
            Err(Error::BindingNotFound(name)) => assert_eq!(name, "ASSETS"),
            other => panic!("Expected BindingNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_vars_and_debug() {
        let env = Env::new()
            .with_var("ENVIRONMENT", "production")
            .with_binding(ASSETS_BINDING, Arc::new(Nothing));
        assert_eq!(env.var("ENVIRONMENT"), Some("production"));
        assert_eq!(env.var("MISSING"), None);
        assert!(format!("{env:?}").contains("ASSETS"));
    }
}
