//! The permission resolver: the decision engine of the permit crates.
//!
//! The resolver answers one question — may these roles perform this action
//! on this resource, optionally on one instance, optionally as its owner —
//! by composing the action registry (name → bit), the grant store (rows),
//! and the bitmask algebra (bit tests). It is stateless: every answer is a
//! pure function of its inputs and the two collaborator stores, so it is
//! safe to call concurrently without synchronization.
//!
//! The owner path is the delicate part. A grant under the built-in Owner
//! role carries the owning principal's identity and must only be reachable
//! when the caller explicitly asks for an owner check and supplies that
//! identity; a generic check must never incidentally succeed through an
//! owner grant. Both directions are enforced in one place,
//! [`effective_roles`], not scattered across call sites.

use tracing::{debug, warn};

use permit_contracts::{
    action::ResourceAction,
    error::{PermitError, PermitResult},
    grant::{AuthorizationQuery, OwnerMatch, PermissionGrant, Scope, ScopeTarget, UpsertMode},
    role::{PrincipalKey, RoleId},
};

use crate::mask;
use crate::traits::{check_name, check_scope_inputs, ActionRegistry, GrantStore, RoleDirectory};

/// The decision engine, wiring the three collaborator contracts together.
///
/// Construct one resolver per configured backing set and share it freely;
/// all methods take `&self`.
pub struct PermissionResolver {
    registry: Box<dyn ActionRegistry>,
    store: Box<dyn GrantStore>,
    roles: Box<dyn RoleDirectory>,
}

impl PermissionResolver {
    /// Create a resolver over the given collaborator implementations.
    pub fn new(
        registry: Box<dyn ActionRegistry>,
        store: Box<dyn GrantStore>,
        roles: Box<dyn RoleDirectory>,
    ) -> Self {
        Self { registry, store, roles }
    }

    /// The action registry this resolver consults.
    pub fn registry(&self) -> &dyn ActionRegistry {
        self.registry.as_ref()
    }

    /// The grant store this resolver consults.
    pub fn store(&self) -> &dyn GrantStore {
        self.store.as_ref()
    }

    /// The role directory this resolver consults.
    pub fn roles(&self) -> &dyn RoleDirectory {
        self.roles.as_ref()
    }

    // ── Read path ────────────────────────────────────────────────────────────

    /// Decide whether `role_ids` may perform `action_name` on
    /// `resource_name`, walking the built-in scope hierarchy: resource-wide
    /// grants always count, and instance grants count when `instance_key`
    /// is supplied.
    ///
    /// `owner` selects the explicit owner-check path: when `Some`, the
    /// built-in Owner role joins the candidate set and an Owner-role grant
    /// whose stored owner key equals the supplied one authorizes the action
    /// irrespective of scope. An owner check requires `instance_key`.
    ///
    /// Returns `Ok(false)` for "denied" — absence of any matching grant.
    /// An undefined action is `Err(UnknownAction)`, a configuration error
    /// callers must not conflate with denial.
    pub fn authorize(
        &self,
        role_ids: &[RoleId],
        action_name: &str,
        resource_name: &str,
        instance_key: Option<&str>,
        owner: Option<&PrincipalKey>,
    ) -> PermitResult<bool> {
        if owner.is_some() && instance_key.map_or(true, str::is_empty) {
            return Err(PermitError::invalid(
                "instance key must be provided for an owner check",
            ));
        }

        let mut targets = vec![ScopeTarget::all()];
        if let Some(key) = instance_key {
            if !key.is_empty() {
                targets.push(ScopeTarget::instance(key));
            }
        }

        self.authorize_at(role_ids, action_name, resource_name, &targets, owner)
    }

    /// Single-scope variant of [`authorize`](Self::authorize) with no owner
    /// check, for callers that already know which scope applies.
    pub fn authorize_at_scope(
        &self,
        role_ids: &[RoleId],
        action_name: &str,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<bool> {
        check_scope_inputs(scope, instance_key)?;
        let target = ScopeTarget { scope, instance_key: instance_key.map(str::to_string) };
        self.authorize_at(role_ids, action_name, resource_name, &[target], None)
    }

    /// The full resolution algorithm over an arbitrary ordered list of
    /// scope targets.
    ///
    /// The built-in hierarchy is two levels, but nothing here assumes that:
    /// a finer-grained hierarchy is the same algorithm with a longer list.
    /// `Instance` targets without a key contribute nothing to the match.
    ///
    /// Steps:
    /// 1. Resolve the action's bit (`UnknownAction` if undefined).
    /// 2. Compute the effective role set — Owner role added on the owner
    ///    path, removed otherwise.
    /// 3. Ask the store whether any grant matches the combined predicate.
    ///    One matching grant suffices; there is no deny-overrides rule.
    pub fn authorize_at(
        &self,
        role_ids: &[RoleId],
        action_name: &str,
        resource_name: &str,
        targets: &[ScopeTarget],
        owner: Option<&PrincipalKey>,
    ) -> PermitResult<bool> {
        check_name(resource_name, "resource name")?;
        check_name(action_name, "action name")?;

        let action = self.registry.resolve(resource_name, action_name)?;
        let owner_role = self.roles.owner_role_id()?;
        let effective = effective_roles(role_ids, owner_role, owner.is_some());

        let query = AuthorizationQuery {
            resource_name: resource_name.to_string(),
            role_ids: effective,
            action_bit: action.bit_value,
            targets: targets.to_vec(),
            owner: owner.map(|key| OwnerMatch { role_id: owner_role, key: key.clone() }),
        };

        let authorized = self.store.query_authorized(&query)?;

        debug!(
            resource = %resource_name,
            action = %action_name,
            roles = ?query.role_ids,
            owner_check = owner.is_some(),
            authorized,
            "authorization decision"
        );

        Ok(authorized)
    }

    /// True if `grant` authorizes `action`, for callers that already hold
    /// both and want to skip a registry lookup.
    pub fn grant_has_action(
        &self,
        grant: &PermissionGrant,
        action: &ResourceAction,
    ) -> PermitResult<bool> {
        mask::has_all(grant.actions_mask, action.bit_value)
    }

    // ── Grant accessors ──────────────────────────────────────────────────────

    /// The grant held by one role for the resource at the scope, if any.
    pub fn grant(
        &self,
        role_id: RoleId,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<Option<PermissionGrant>> {
        self.check_grant_inputs(resource_name, scope, instance_key)?;
        self.store.get(resource_name, role_id, scope, instance_key)
    }

    /// All grants (any role) for the resource at the scope.
    pub fn grants(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<Vec<PermissionGrant>> {
        self.check_grant_inputs(resource_name, scope, instance_key)?;
        self.store.query(resource_name, scope, instance_key)
    }

    /// The Owner-role grant for one resource instance, if any.
    pub fn owner_grant(
        &self,
        resource_name: &str,
        instance_key: &str,
    ) -> PermitResult<Option<PermissionGrant>> {
        let owner_role = self.roles.owner_role_id()?;
        self.grant(owner_role, resource_name, Scope::Instance, Some(instance_key))
    }

    // ── Mutation path: add (OR into the existing mask) ───────────────────────

    /// Grant the role one action by name at the scope.
    ///
    /// The name is converted through the registry's lenient mask lookup, so
    /// an unknown name contributes no bits rather than failing.
    pub fn add_permission(
        &self,
        role_id: RoleId,
        action_name: &str,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        check_name(action_name, "action name")?;
        let actions_mask = self.registry.names_to_mask(resource_name, &[action_name])?;
        self.add_permissions(role_id, actions_mask, resource_name, scope, instance_key)
    }

    /// Grant the role a precomputed action mask at the scope, ORing it into
    /// any existing grant under the same key.
    ///
    /// The Owner role is rejected here: owner grants carry the owning
    /// identity and must go through
    /// [`set_owner_permissions`](Self::set_owner_permissions).
    pub fn add_permissions(
        &self,
        role_id: RoleId,
        actions_mask: i32,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        self.check_grant_inputs(resource_name, scope, instance_key)?;
        self.check_not_owner_role(role_id)?;
        let grant = self.build_grant(role_id, actions_mask, resource_name, scope, instance_key, None)?;
        self.store.upsert(grant, UpsertMode::Merge)
    }

    /// Grant the role several actions by name at the scope. Unknown names
    /// are skipped, per the registry's lenient mask lookup.
    pub fn add_permissions_by_names(
        &self,
        role_id: RoleId,
        action_names: &[&str],
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        let actions_mask = self.registry.names_to_mask(resource_name, action_names)?;
        self.add_permissions(role_id, actions_mask, resource_name, scope, instance_key)
    }

    /// [`add_permission`](Self::add_permission) with the role given by name,
    /// resolved through the role directory. An unknown role name is
    /// `Err(UnknownRole)`.
    pub fn add_permission_for_role_name(
        &self,
        role_name: &str,
        action_name: &str,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        let role_id = self.resolve_role(role_name)?;
        self.add_permission(role_id, action_name, resource_name, scope, instance_key)
    }

    /// [`add_permissions`](Self::add_permissions) with the role given by
    /// name.
    pub fn add_permissions_for_role_name(
        &self,
        role_name: &str,
        actions_mask: i32,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        let role_id = self.resolve_role(role_name)?;
        self.add_permissions(role_id, actions_mask, resource_name, scope, instance_key)
    }

    // ── Mutation path: set (replace the mask outright) ───────────────────────

    /// Replace the role's grant mask at the scope with `actions_mask`.
    pub fn set_permissions(
        &self,
        role_id: RoleId,
        actions_mask: i32,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        self.check_grant_inputs(resource_name, scope, instance_key)?;
        self.check_not_owner_role(role_id)?;
        let grant = self.build_grant(role_id, actions_mask, resource_name, scope, instance_key, None)?;
        self.store.upsert(grant, UpsertMode::Replace)
    }

    /// [`set_permissions`](Self::set_permissions) with the mask built from
    /// action names. Unknown names are skipped.
    pub fn set_permissions_by_names(
        &self,
        role_id: RoleId,
        action_names: &[&str],
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<PermissionGrant> {
        let actions_mask = self.registry.names_to_mask(resource_name, action_names)?;
        self.set_permissions(role_id, actions_mask, resource_name, scope, instance_key)
    }

    // ── Mutation path: owner grants ──────────────────────────────────────────

    /// Record that the principal `owner_key` owns the resource instance and
    /// holds `actions_mask` on it.
    ///
    /// The grant is always under the built-in Owner role at instance scope;
    /// the mask replaces any existing owner grant for the instance.
    pub fn set_owner_permissions(
        &self,
        owner_key: &PrincipalKey,
        actions_mask: i32,
        resource_name: &str,
        instance_key: &str,
    ) -> PermitResult<PermissionGrant> {
        self.check_grant_inputs(resource_name, Scope::Instance, Some(instance_key))?;
        let owner_role = self.roles.owner_role_id()?;
        let grant = self.build_grant(
            owner_role,
            actions_mask,
            resource_name,
            Scope::Instance,
            Some(instance_key),
            Some(owner_key.clone()),
        )?;
        self.store.upsert(grant, UpsertMode::Replace)
    }

    /// [`set_owner_permissions`](Self::set_owner_permissions) with the mask
    /// built from action names. Unknown names are skipped.
    pub fn set_owner_permissions_by_names(
        &self,
        owner_key: &PrincipalKey,
        action_names: &[&str],
        resource_name: &str,
        instance_key: &str,
    ) -> PermitResult<PermissionGrant> {
        let actions_mask = self.registry.names_to_mask(resource_name, action_names)?;
        self.set_owner_permissions(owner_key, actions_mask, resource_name, instance_key)
    }

    // ── Mutation path: removal ───────────────────────────────────────────────

    /// Remove every grant (any role) for the resource at the scope,
    /// returning how many were removed. Idempotent: re-running after a
    /// partial failure is safe.
    pub fn remove_permissions(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<u64> {
        self.check_grant_inputs(resource_name, scope, instance_key)?;
        self.store.delete(resource_name, scope, instance_key)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn resolve_role(&self, role_name: &str) -> PermitResult<RoleId> {
        check_name(role_name, "role name")?;
        self.roles
            .resolve_role_id(role_name)?
            .ok_or_else(|| PermitError::UnknownRole { role: role_name.to_string() })
    }

    fn check_grant_inputs(
        &self,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
    ) -> PermitResult<()> {
        check_name(resource_name, "resource name")?;
        check_scope_inputs(scope, instance_key)
    }

    fn check_not_owner_role(&self, role_id: RoleId) -> PermitResult<()> {
        if role_id == self.roles.owner_role_id()? {
            warn!(role = %role_id, "rejected generic grant mutation on the owner role");
            return Err(PermitError::invalid(
                "role must not be the owner role; use the owner-specific operations",
            ));
        }
        Ok(())
    }

    /// Assemble a grant row, validating the mask and normalizing the
    /// instance key: only instance-scoped grants carry one.
    fn build_grant(
        &self,
        role_id: RoleId,
        actions_mask: i32,
        resource_name: &str,
        scope: Scope,
        instance_key: Option<&str>,
        owner_key: Option<PrincipalKey>,
    ) -> PermitResult<PermissionGrant> {
        let actions_mask = mask::combine(&[actions_mask])?;
        let instance_key = match scope {
            Scope::All => None,
            Scope::Instance => instance_key.map(str::to_string),
        };
        Ok(PermissionGrant {
            resource_name: resource_name.to_string(),
            role_id,
            scope,
            instance_key,
            actions_mask,
            owner_key,
        })
    }
}

/// Compute the role set an authorization check actually consults.
///
/// On the owner path the built-in Owner role is added if absent, so the
/// owner clause can match. On the generic path it is removed if present —
/// a non-owner-verified check must never reach a role-based owner grant.
fn effective_roles(role_ids: &[RoleId], owner_role: RoleId, owner_check: bool) -> Vec<RoleId> {
    let mut effective: Vec<RoleId> =
        role_ids.iter().copied().filter(|&r| r != owner_role).collect();
    if owner_check {
        effective.push(owner_role);
    }
    effective
}
