//! Permission grant types and the store query contracts.
//!
//! A grant binds one role to a mask of authorized actions on one resource
//! type, at either resource-wide (`All`) or per-instance (`Instance`)
//! scope. At most one grant exists per `(resource, role, scope, instance)`
//! key — stores upsert into that key rather than duplicating rows.

use serde::{Deserialize, Serialize};

use crate::role::{PrincipalKey, RoleId};

/// The breadth of a grant.
///
/// The resolver is written against an ordered *list* of scope targets, so
/// finer-grained levels can be added without changing the algorithm; these
/// two are the built-in, required values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// The grant applies to every instance of the resource type.
    All,
    /// The grant applies to exactly one identified instance.
    Instance,
}

/// One entry of the ordered scope list an authorization check walks.
///
/// `instance_key` is required for `Scope::Instance` targets; a target with
/// `Scope::All` ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeTarget {
    pub scope: Scope,
    pub instance_key: Option<String>,
}

impl ScopeTarget {
    /// A target matching resource-wide grants.
    pub fn all() -> Self {
        Self { scope: Scope::All, instance_key: None }
    }

    /// A target matching grants on one specific instance.
    pub fn instance(key: impl Into<String>) -> Self {
        Self { scope: Scope::Instance, instance_key: Some(key.into()) }
    }
}

/// One row of authorization: a role's action mask for a resource at a scope.
///
/// `owner_key` is set only on instance-scoped grants for the built-in Owner
/// role; it ties the grant to the identity that owns the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub resource_name: String,
    pub role_id: RoleId,
    pub scope: Scope,
    /// Present and non-empty when `scope` is `Instance`, absent otherwise.
    pub instance_key: Option<String>,
    /// Bitwise union of all actions this grant authorizes. Non-negative.
    pub actions_mask: i32,
    /// The owning principal, for Owner-role instance grants only.
    pub owner_key: Option<PrincipalKey>,
}

impl PermissionGrant {
    /// The uniqueness key this grant occupies in a store.
    pub fn key(&self) -> GrantKey {
        GrantKey {
            resource_name: self.resource_name.clone(),
            role_id: self.role_id,
            scope: self.scope,
            instance_key: self.instance_key.clone(),
        }
    }
}

/// The `(resource, role, scope, instance)` tuple a store keys grants by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantKey {
    pub resource_name: String,
    pub role_id: RoleId,
    pub scope: Scope,
    pub instance_key: Option<String>,
}

/// How an upsert combines with an existing grant under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    /// OR the new mask into the existing one ("add" semantics). The
    /// existing `owner_key` is kept unless the new grant supplies one.
    Merge,
    /// Replace the mask and `owner_key` outright ("set" semantics).
    Replace,
}

/// The owner clause of an authorization query: a grant under the Owner
/// role whose `owner_key` equals `key` authorizes regardless of the scope
/// targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerMatch {
    pub role_id: RoleId,
    pub key: PrincipalKey,
}

/// The combined predicate a store answers for the resolver.
///
/// A grant matches when its resource equals `resource_name`, its role is in
/// `role_ids`, its mask contains `action_bit`, and either its scope/instance
/// pair matches one of `targets` or the owner clause applies. Stores may
/// execute this as one query or by composing simpler reads; the observable
/// result must be identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationQuery {
    pub resource_name: String,
    /// The effective role set, owner role already added or removed.
    pub role_ids: Vec<RoleId>,
    /// The single bit of the requested action.
    pub action_bit: i32,
    /// Ordered scope/instance pairs to test. `Instance` targets without a
    /// key contribute nothing.
    pub targets: Vec<ScopeTarget>,
    /// Set only on the explicit owner-check path.
    pub owner: Option<OwnerMatch>,
}
