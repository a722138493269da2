//! In-memory implementation of `RoleDirectory`.
//!
//! `MemoryRoleDirectory` seeds the four built-in roles at construction and
//! supports the management operations an administrable directory needs:
//! adding, removing, and renaming roles. The built-in roles are protected
//! — they anchor the resolver's owner special-casing and must always
//! resolve.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use permit_contracts::{
    error::{PermitError, PermitResult},
    role::{BuiltinRole, Role, RoleId},
};
use permit_core::traits::{check_name, RoleDirectory};

struct RoleTable {
    roles: Vec<Role>,
    next_id: i64,
}

/// An in-memory role directory with the built-in roles pre-seeded.
///
/// Seed order fixes the built-in ids: Super Admin = 1, Guest = 2,
/// User = 3, Owner = 4.
pub struct MemoryRoleDirectory {
    inner: Arc<Mutex<RoleTable>>,
}

impl MemoryRoleDirectory {
    const BUILTIN_SEED: [BuiltinRole; 4] = [
        BuiltinRole::SuperAdmin,
        BuiltinRole::Guest,
        BuiltinRole::RegularUser,
        BuiltinRole::Owner,
    ];

    /// Create a directory containing exactly the four built-in roles.
    pub fn new() -> Self {
        let roles = Self::BUILTIN_SEED
            .iter()
            .enumerate()
            .map(|(i, builtin)| Role {
                role_id: RoleId(i as i64 + 1),
                name: builtin.name().to_string(),
            })
            .collect::<Vec<_>>();
        let next_id = roles.len() as i64 + 1;
        Self { inner: Arc::new(Mutex::new(RoleTable { roles, next_id })) }
    }

    /// Add a role by name, returning its id.
    ///
    /// Idempotent: adding a name that already exists returns the existing
    /// id unchanged.
    pub fn add_role(&self, role_name: &str) -> PermitResult<RoleId> {
        check_name(role_name, "role name")?;
        let mut table = self.locked()?;
        if let Some(existing) = table.roles.iter().find(|r| r.name == role_name) {
            return Ok(existing.role_id);
        }
        let role_id = RoleId(table.next_id);
        table.next_id += 1;
        table.roles.push(Role { role_id, name: role_name.to_string() });
        debug!(role = %role_id, name = %role_name, "role added");
        Ok(role_id)
    }

    /// Remove a role by name. Returns `Ok(false)` if no such role exists.
    ///
    /// The built-in roles cannot be removed.
    pub fn remove_role(&self, role_name: &str) -> PermitResult<bool> {
        check_name(role_name, "role name")?;
        Self::check_not_builtin(role_name)?;
        let mut table = self.locked()?;
        let before = table.roles.len();
        table.roles.retain(|r| r.name != role_name);
        Ok(table.roles.len() < before)
    }

    /// Rename a role. Returns `Ok(false)` if the id is unknown.
    ///
    /// The built-in roles cannot be renamed, and a name already in use
    /// cannot be taken.
    pub fn rename_role(&self, role_id: RoleId, role_name: &str) -> PermitResult<bool> {
        check_name(role_name, "role name")?;
        let mut table = self.locked()?;
        if table.roles.iter().any(|r| r.name == role_name) {
            return Err(PermitError::invalid(format!(
                "a role named '{role_name}' already exists"
            )));
        }
        let Some(role) = table.roles.iter_mut().find(|r| r.role_id == role_id) else {
            return Ok(false);
        };
        Self::check_not_builtin(&role.name)?;
        role.name = role_name.to_string();
        Ok(true)
    }

    /// All roles, in insertion order.
    pub fn all_roles(&self) -> PermitResult<Vec<Role>> {
        Ok(self.locked()?.roles.clone())
    }

    fn check_not_builtin(role_name: &str) -> PermitResult<()> {
        if Self::BUILTIN_SEED.iter().any(|b| b.name() == role_name) {
            return Err(PermitError::invalid(format!(
                "built-in role '{role_name}' cannot be modified"
            )));
        }
        Ok(())
    }

    fn locked(&self) -> PermitResult<MutexGuard<'_, RoleTable>> {
        self.inner.lock().map_err(|e| PermitError::StoreUnavailable {
            reason: format!("role directory lock poisoned: {e}"),
        })
    }
}

impl Default for MemoryRoleDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDirectory for MemoryRoleDirectory {
    fn resolve_role_id(&self, role_name: &str) -> PermitResult<Option<RoleId>> {
        check_name(role_name, "role name")?;
        Ok(self
            .locked()?
            .roles
            .iter()
            .find(|r| r.name == role_name)
            .map(|r| r.role_id))
    }

    fn builtin_role_id(&self, role: BuiltinRole) -> PermitResult<RoleId> {
        // Builtins head the seed order and cannot be removed or renamed,
        // so their ids are fixed at construction.
        Ok(match role {
            BuiltinRole::SuperAdmin => RoleId(1),
            BuiltinRole::Guest => RoleId(2),
            BuiltinRole::RegularUser => RoleId(3),
            BuiltinRole::Owner => RoleId(4),
        })
    }
}
