//! In-memory implementation of `GrantStore`.
//!
//! `MemoryGrantStore` is the reference implementation of the `GrantStore`
//! trait: a `HashMap` keyed by `GrantKey` behind a `Mutex`. It is intended
//! for tests, demos, and embedding applications whose grant sets fit in
//! memory; a database-backed store satisfies the same contract with the
//! predicate pushed down as a query.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use permit_contracts::{
    error::{PermitError, PermitResult},
    grant::{AuthorizationQuery, GrantKey, PermissionGrant, Scope, UpsertMode},
    role::RoleId,
};
use permit_core::mask;
use permit_core::traits::GrantStore;

type GrantTable = HashMap<GrantKey, PermissionGrant>;

/// An in-memory, mutex-guarded grant store.
///
/// # Thread safety
///
/// Every operation acquires the internal `Mutex`, so each call — including
/// the read-modify-write inside [`upsert`](GrantStore::upsert) — is atomic
/// per key. Concurrent adds and sets on the same key serialize;
/// last-writer-wins for `Replace`, and no `Merge` update is lost.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    grants: Arc<Mutex<GrantTable>>,
}

impl MemoryGrantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All grants currently held, in no particular order.
    pub fn all_grants(&self) -> PermitResult<Vec<PermissionGrant>> {
        Ok(self.locked()?.values().cloned().collect())
    }

    fn locked(&self) -> PermitResult<MutexGuard<'_, GrantTable>> {
        self.grants.lock().map_err(|e| PermitError::StoreUnavailable {
            reason: format!("grant store lock poisoned: {e}"),
        })
    }

    /// Build the lookup key; `All`-scoped keys never carry an instance.
    fn key_for(
        resource_name: &str,
        role_id: RoleId,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> GrantKey {
        GrantKey {
            resource_name: resource_name.to_string(),
            role_id,
            scope,
            instance_key: match scope {
                Scope::All => None,
                Scope::Instance => instance_key.map(str::to_string),
            },
        }
    }

    fn scope_filter(grant: &PermissionGrant, scope: Scope, instance_key: Option<&str>) -> bool {
        grant.scope == scope
            && (scope == Scope::All || grant.instance_key.as_deref() == instance_key)
    }

    /// The scope clause of the combined predicate: the grant's scope and
    /// instance match one of the query's targets. An `All` target matches
    /// resource-wide grants regardless of instance; an `Instance` target
    /// without a key contributes nothing.
    fn scope_clause(grant: &PermissionGrant, query: &AuthorizationQuery) -> bool {
        query.targets.iter().any(|target| match target.scope {
            Scope::All => grant.scope == Scope::All,
            Scope::Instance => target.instance_key.as_deref().map_or(false, |key| {
                grant.scope == Scope::Instance && grant.instance_key.as_deref() == Some(key)
            }),
        })
    }

    /// The owner clause: an Owner-role grant tied to the supplied
    /// principal authorizes independent of the scope targets.
    fn owner_clause(grant: &PermissionGrant, query: &AuthorizationQuery) -> bool {
        query.owner.as_ref().map_or(false, |owner| {
            grant.role_id == owner.role_id && grant.owner_key.as_ref() == Some(&owner.key)
        })
    }
}

impl GrantStore for MemoryGrantStore {
    fn get(
        &self,
        resource_name: &str,
        role_id: RoleId,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<Option<PermissionGrant>> {
        let key = Self::key_for(resource_name, role_id, scope, instance_key);
        Ok(self.locked()?.get(&key).cloned())
    }

    fn query(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<Vec<PermissionGrant>> {
        Ok(self
            .locked()?
            .values()
            .filter(|g| {
                g.resource_name == resource_name && Self::scope_filter(g, scope, instance_key)
            })
            .cloned()
            .collect())
    }

    /// Insert or update under the grant's key, in one lock acquisition.
    fn upsert(&self, grant: PermissionGrant, mode: UpsertMode) -> PermitResult<PermissionGrant> {
        let mut table = self.locked()?;
        let key = grant.key();

        let stored = match table.get_mut(&key) {
            Some(existing) => {
                match mode {
                    UpsertMode::Merge => {
                        existing.actions_mask = mask::add(existing.actions_mask, grant.actions_mask)?;
                        if grant.owner_key.is_some() {
                            existing.owner_key = grant.owner_key;
                        }
                    }
                    UpsertMode::Replace => {
                        existing.actions_mask = grant.actions_mask;
                        existing.owner_key = grant.owner_key;
                    }
                }
                existing.clone()
            }
            None => {
                table.insert(key, grant.clone());
                grant
            }
        };

        debug!(
            resource = %stored.resource_name,
            role = %stored.role_id,
            mask = stored.actions_mask,
            "grant upserted"
        );
        Ok(stored)
    }

    fn delete(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<u64> {
        let mut table = self.locked()?;
        let before = table.len();
        table.retain(|_, g| {
            !(g.resource_name == resource_name && Self::scope_filter(g, scope, instance_key))
        });
        let removed = (before - table.len()) as u64;
        debug!(resource = %resource_name, removed, "grants deleted");
        Ok(removed)
    }

    fn query_authorized(&self, query: &AuthorizationQuery) -> PermitResult<bool> {
        let table = self.locked()?;
        for grant in table.values() {
            if grant.resource_name != query.resource_name
                || !query.role_ids.contains(&grant.role_id)
            {
                continue;
            }
            if !mask::has_all(grant.actions_mask, query.action_bit)? {
                continue;
            }
            if Self::scope_clause(grant, query) || Self::owner_clause(grant, query) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
