//! Collaborator trait definitions for the permission resolver.
//!
//! Three traits define the seam between the resolution algorithm and its
//! storage:
//!
//! - `ActionRegistry` — the catalog of (resource, action) → bit definitions
//! - `GrantStore`     — the rows binding roles to action masks
//! - `RoleDirectory`  — role-name lookup and the four built-in role ids
//!
//! Any storage technology satisfies these contracts as long as it honors
//! the uniqueness, atomicity, and error-reporting rules documented on each
//! method. Implementations must be safe for concurrent reads; the resolver
//! adds no synchronization of its own.

use permit_contracts::{
    action::{ActionDef, ResourceAction},
    error::{PermitError, PermitResult},
    grant::{AuthorizationQuery, PermissionGrant, Scope, UpsertMode},
    role::{BuiltinRole, RoleId},
};

use crate::mask;

/// Fail with `InvalidArgument` if a required name is empty.
pub fn check_name(value: &str, what: &str) -> PermitResult<()> {
    if value.is_empty() {
        return Err(PermitError::invalid(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Validate a scope/instance pairing: `Instance` requires a non-empty key.
pub fn check_scope_inputs(scope: Scope, instance_key: Option<&str>) -> PermitResult<()> {
    if scope == Scope::Instance && instance_key.map_or(true, str::is_empty) {
        return Err(PermitError::invalid(
            "instance key must be provided for instance scope",
        ));
    }
    Ok(())
}

/// The catalog of grantable actions, keyed by (resource name, action name).
///
/// Two interchangeable backings exist: an immutable catalog sourced from
/// configuration and a live, administrable in-memory one. Both satisfy the
/// read contract identically; the immutable backing answers every mutator
/// with `UnsupportedOperation`.
///
/// Lookup strictness is asymmetric and deliberate: `resolve` and `exists`
/// are strict, while `names_to_mask` silently skips unknown names so bulk
/// conversions stay usable while the catalog evolves.
pub trait ActionRegistry: Send + Sync {
    /// Look up one action. Fails with `UnknownAction` if it is not defined.
    fn resolve(&self, resource_name: &str, action_name: &str) -> PermitResult<ResourceAction>;

    /// True if the action is defined for the resource type.
    fn exists(&self, resource_name: &str, action_name: &str) -> PermitResult<bool>;

    /// All actions defined for the resource type, in definition order.
    /// An unknown resource type yields an empty list, not an error.
    fn list_actions(&self, resource_name: &str) -> PermitResult<Vec<ResourceAction>>;

    /// Combine the bit values of the named actions into one mask.
    ///
    /// Names with no definition are skipped, not reported.
    fn names_to_mask(&self, resource_name: &str, action_names: &[&str]) -> PermitResult<i32> {
        check_name(resource_name, "resource name")?;
        let bits: Vec<i32> = self
            .list_actions(resource_name)?
            .into_iter()
            .filter(|a| action_names.contains(&a.action_name.as_str()))
            .map(|a| a.bit_value)
            .collect();
        mask::combine(&bits)
    }

    /// The names of all defined actions whose bits are present in `mask`,
    /// in definition order (not bit order).
    fn mask_to_names(&self, resource_name: &str, actions_mask: i32) -> PermitResult<Vec<String>> {
        check_name(resource_name, "resource name")?;
        let mut names = Vec::new();
        for action in self.list_actions(resource_name)? {
            if mask::has_all(actions_mask, action.bit_value)? {
                names.push(action.action_name);
            }
        }
        Ok(names)
    }

    /// Define one action.
    ///
    /// Returns `Ok(true)` if added, `Ok(false)` if an action with the same
    /// name *or* the same bit value already exists for the resource type —
    /// never an error, so bulk definition stays idempotent. The bit value
    /// is validated (power of two, within range) before any change.
    fn define(&self, resource_name: &str, action_name: &str, bit_value: i32) -> PermitResult<bool>;

    /// Define several actions, skipping any that already exist by name or
    /// bit. Returns `Ok(true)` if at least one was added.
    fn define_all(&self, resource_name: &str, actions: &[ActionDef]) -> PermitResult<bool>;

    /// Remove one action. Returns `Ok(false)` if it was not defined.
    fn undefine(&self, resource_name: &str, action_name: &str) -> PermitResult<bool>;

    /// Remove every action of the resource type, returning how many were
    /// removed.
    fn undefine_all(&self, resource_name: &str) -> PermitResult<u64>;

    /// Replace the resource type's catalog: remove all existing actions,
    /// then define `actions`. Idempotent on retry.
    fn redefine(&self, resource_name: &str, actions: &[ActionDef]) -> PermitResult<bool> {
        self.undefine_all(resource_name)?;
        self.define_all(resource_name, actions)
    }
}

/// The store of permission grants.
///
/// Grants are unique per `(resource, role, scope, instance)` key. The
/// fetch-or-create-then-write sequence of an "add" must not lose a
/// concurrent update on the same key, so the write primitive is a single
/// conditional [`upsert`](GrantStore::upsert) each implementation executes
/// atomically per key and documents how.
pub trait GrantStore: Send + Sync {
    /// Fetch the grant under the given key, if any.
    fn get(
        &self,
        resource_name: &str,
        role_id: RoleId,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<Option<PermissionGrant>>;

    /// All grants (any role) for the resource at the scope.
    fn query(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<Vec<PermissionGrant>>;

    /// Insert or update under the grant's key, returning the stored row.
    ///
    /// `Merge` ORs the new mask into any existing one; `Replace` overwrites
    /// mask and owner key. The whole read-modify-write must be atomic for
    /// the key.
    fn upsert(&self, grant: PermissionGrant, mode: UpsertMode) -> PermitResult<PermissionGrant>;

    /// Remove every grant (any role) under the resource/scope/instance,
    /// returning how many were removed. Used for bulk revocation when a
    /// resource instance is deleted.
    fn delete(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<u64>;

    /// True if at least one grant matches the combined predicate.
    ///
    /// This is the resolver's hot path. A store may push the predicate down
    /// as one query or scan with the simpler primitives; either way the
    /// observable result must match the match rule documented on
    /// [`AuthorizationQuery`].
    fn query_authorized(&self, query: &AuthorizationQuery) -> PermitResult<bool>;
}

/// Role-name resolution and the built-in role identifiers.
///
/// The resolver treats role ids as opaque integers and has no opinion on
/// how roles are assigned to principals.
pub trait RoleDirectory: Send + Sync {
    /// The id of a role by name, or `None` if no such role exists.
    fn resolve_role_id(&self, role_name: &str) -> PermitResult<Option<RoleId>>;

    /// The id of one of the four built-in roles. These always exist.
    fn builtin_role_id(&self, role: BuiltinRole) -> PermitResult<RoleId>;

    /// The id of the built-in Guest role.
    fn guest_role_id(&self) -> PermitResult<RoleId> {
        self.builtin_role_id(BuiltinRole::Guest)
    }

    /// The id of the built-in User role (a signed-in regular user).
    fn regular_user_role_id(&self) -> PermitResult<RoleId> {
        self.builtin_role_id(BuiltinRole::RegularUser)
    }

    /// The id of the built-in Owner role.
    fn owner_role_id(&self) -> PermitResult<RoleId> {
        self.builtin_role_id(BuiltinRole::Owner)
    }

    /// The id of the built-in Super Admin role.
    fn super_admin_role_id(&self) -> PermitResult<RoleId> {
        self.builtin_role_id(BuiltinRole::SuperAdmin)
    }
}
