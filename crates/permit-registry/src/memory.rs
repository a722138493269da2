//! The mutable, in-memory `ActionRegistry` backing.
//!
//! `MemoryActionRegistry` is the live, administrable counterpart of
//! [`CatalogActionRegistry`](crate::CatalogActionRegistry): the same read
//! contract, plus working mutators. Definitions are held per resource type
//! in definition order behind a `Mutex`, so the registry is safe to share
//! across threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use permit_contracts::{
    action::{ActionDef, ResourceAction},
    error::{PermitError, PermitResult},
};
use permit_core::mask;
use permit_core::traits::{check_name, ActionRegistry};

use crate::catalog::CatalogConfig;

type ActionTable = HashMap<String, Vec<ResourceAction>>;

/// An `ActionRegistry` holding its definitions in memory, mutable through
/// the full registry contract.
///
/// # Thread safety
///
/// Every operation acquires an internal `Mutex`, so each call is atomic.
/// `redefine` is remove-all-then-add across two acquisitions and is not
/// atomic as a whole; it is idempotent, so retrying after a partial
/// failure is safe.
#[derive(Debug, Default)]
pub struct MemoryActionRegistry {
    actions_by_resource: Arc<Mutex<ActionTable>>,
}

impl MemoryActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded from a validated catalog.
    pub fn with_catalog(config: CatalogConfig) -> PermitResult<Self> {
        config.validate()?;
        Ok(Self {
            actions_by_resource: Arc::new(Mutex::new(config.into_actions_by_resource())),
        })
    }

    fn locked(&self) -> PermitResult<MutexGuard<'_, ActionTable>> {
        self.actions_by_resource.lock().map_err(|e| PermitError::StoreUnavailable {
            reason: format!("action registry lock poisoned: {e}"),
        })
    }

    /// True if the resource already has an action with this name or bit.
    /// A colliding definition is "already present", not an error, so bulk
    /// definition stays idempotent.
    fn collides(actions: &[ResourceAction], name: &str, bit: i32) -> bool {
        actions.iter().any(|a| a.action_name == name || a.bit_value == bit)
    }

    /// The 30-action cap per resource type needs no explicit count: bit
    /// uniqueness plus the `2^29` range bound leave exactly 30 legal bits.
    fn insert(
        table: &mut ActionTable,
        resource_name: &str,
        action_name: &str,
        bit_value: i32,
    ) -> PermitResult<bool> {
        mask::check_bit_value(bit_value)?;

        let actions = table.entry(resource_name.to_string()).or_default();
        if Self::collides(actions, action_name, bit_value) {
            return Ok(false);
        }

        actions.push(ResourceAction::new(resource_name, action_name, bit_value));
        Ok(true)
    }
}

impl ActionRegistry for MemoryActionRegistry {
    fn resolve(&self, resource_name: &str, action_name: &str) -> PermitResult<ResourceAction> {
        check_name(resource_name, "resource name")?;
        check_name(action_name, "action name")?;
        self.locked()?
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
            .locked()?
            .get(resource_name)
            .is_some_and(|actions| actions.iter().any(|a| a.action_name == action_name)))
    }

    fn list_actions(&self, resource_name: &str) -> PermitResult<Vec<ResourceAction>> {
        check_name(resource_name, "resource name")?;
        Ok(self.locked()?.get(resource_name).cloned().unwrap_or_default())
    }

    fn define(&self, resource_name: &str, action_name: &str, bit_value: i32) -> PermitResult<bool> {
        check_name(resource_name, "resource name")?;
        check_name(action_name, "action name")?;

        let mut table = self.locked()?;
        let added = Self::insert(&mut table, resource_name, action_name, bit_value)?;
        debug!(
            resource = %resource_name,
            action = %action_name,
            bit = bit_value,
            added,
            "define action"
        );
        Ok(added)
    }

    fn define_all(&self, resource_name: &str, actions: &[ActionDef]) -> PermitResult<bool> {
        check_name(resource_name, "resource name")?;

        let mut table = self.locked()?;
        let mut any_added = false;
        for def in actions {
            check_name(&def.name, "action name")?;
            if Self::insert(&mut table, resource_name, &def.name, def.bit)? {
                any_added = true;
            }
        }
        Ok(any_added)
    }

    fn undefine(&self, resource_name: &str, action_name: &str) -> PermitResult<bool> {
        check_name(resource_name, "resource name")?;
        check_name(action_name, "action name")?;

        let mut table = self.locked()?;
        let Some(actions) = table.get_mut(resource_name) else {
            return Ok(false);
        };
        let before = actions.len();
        actions.retain(|a| a.action_name != action_name);
        Ok(actions.len() < before)
    }

    fn undefine_all(&self, resource_name: &str) -> PermitResult<u64> {
        check_name(resource_name, "resource name")?;
        let removed = self
            .locked()?
            .remove(resource_name)
            .map_or(0, |actions| actions.len() as u64);
        debug!(resource = %resource_name, removed, "undefine all actions");
        Ok(removed)
    }
}
