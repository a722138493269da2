//! The configuration-sourced, immutable `ActionRegistry` backing.
//!
//! `CatalogActionRegistry` loads a [`CatalogConfig`] from a TOML string or
//! file and serves it read-only. Every mutating call fails with
//! `UnsupportedOperation` — this backing is a fixed catalog by design; use
//! [`MemoryActionRegistry`](crate::MemoryActionRegistry) for a live,
//! administrable one.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use permit_contracts::{
    action::{ActionDef, ResourceAction},
    error::{PermitError, PermitResult},
};
use permit_core::traits::{check_name, ActionRegistry};

use crate::catalog::CatalogConfig;

/// An `ActionRegistry` that reads its definitions from a TOML catalog once,
/// at construction, and never changes them.
///
/// Construct via [`from_toml_str`](Self::from_toml_str) or
/// [`from_file`](Self::from_file), then pass to the resolver.
#[derive(Debug)]
pub struct CatalogActionRegistry {
    actions_by_resource: HashMap<String, Vec<ResourceAction>>,
}

impl CatalogActionRegistry {
    /// Build a registry from an already-parsed catalog, validating every
    /// catalog invariant first.
    pub fn new(config: CatalogConfig) -> PermitResult<Self> {
        config.validate()?;
        let actions_by_resource = config.into_actions_by_resource();
        debug!(
            resources = actions_by_resource.len(),
            "loaded immutable action catalog"
        );
        Ok(Self { actions_by_resource })
    }

    /// Parse `s` as TOML and build a registry.
    ///
    /// Returns `InvalidArgument` if the TOML is malformed or violates a
    /// catalog invariant.
    pub fn from_toml_str(s: &str) -> PermitResult<Self> {
        let config: CatalogConfig = toml::from_str(s).map_err(|e| {
            PermitError::invalid(format!("failed to parse action catalog TOML: {e}"))
        })?;
        Self::new(config)
    }

    /// Read the file at `path` and parse it as a TOML catalog.
    pub fn from_file(path: &Path) -> PermitResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PermitError::invalid(format!(
                "failed to read action catalog '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    fn unsupported(operation: &str) -> PermitError {
        PermitError::UnsupportedOperation { operation: operation.to_string() }
    }
}

impl ActionRegistry for CatalogActionRegistry {
    fn resolve(&self, resource_name: &str, action_name: &str) -> PermitResult<ResourceAction> {
        check_name(resource_name, "resource name")?;
        check_name(action_name, "action name")?;
        self.actions_by_resource
            .get(resource_name)
            .and_then(|actions| actions.iter().find(|a| a.action_name == action_name))
            .cloned()
            .ok_or_else(|| PermitError::UnknownAction {
                resource: resource_name.to_string(),
                action: action_name.to_string(),
            })
    }

    fn exists(&self, resource_name: &str, action_name: &str) -> PermitResult<bool> {
        check_name(resource_name, "resource name")?;
        check_name(action_name, "action name")?;
        Ok(self
            .actions_by_resource
            .get(resource_name)
            .is_some_and(|actions| actions.iter().any(|a| a.action_name == action_name)))
    }

    fn list_actions(&self, resource_name: &str) -> PermitResult<Vec<ResourceAction>> {
        check_name(resource_name, "resource name")?;
        Ok(self.actions_by_resource.get(resource_name).cloned().unwrap_or_default())
    }

    fn define(&self, _: &str, _: &str, _: i32) -> PermitResult<bool> {
        Err(Self::unsupported("define"))
    }

    fn define_all(&self, _: &str, _: &[ActionDef]) -> PermitResult<bool> {
        Err(Self::unsupported("define_all"))
    }

    fn undefine(&self, _: &str, _: &str) -> PermitResult<bool> {
        Err(Self::unsupported("undefine"))
    }

    fn undefine_all(&self, _: &str) -> PermitResult<u64> {
        Err(Self::unsupported("undefine_all"))
    }

    fn redefine(&self, _: &str, _: &[ActionDef]) -> PermitResult<bool> {
        Err(Self::unsupported("redefine"))
    }
}
