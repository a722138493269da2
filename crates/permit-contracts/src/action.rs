//! Resource action types.
//!
//! An action is a named operation on a *resource type* (not an instance),
//! encoded as one bit of a 32-bit signed mask. A resource type can define
//! at most [`MAX_ACTIONS_PER_RESOURCE`] actions: the sign bit is unusable
//! and one bit is reserved for internal use.

use serde::{Deserialize, Serialize};

/// The maximum number of distinct actions one resource type may define.
pub const MAX_ACTIONS_PER_RESOURCE: usize = 30;

/// The highest bit value a registered action may use (`2^29`).
pub const MAX_ACTION_BIT: i32 = 1 << 29;

/// One grantable action on a resource type.
///
/// `bit_value` must be a power of two and unique within `resource_name`;
/// registries enforce both invariants on every definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAction {
    /// The resource type this action applies to, e.g. `"user"`.
    pub resource_name: String,
    /// The action name, unique within the resource type, e.g. `"user.edit"`.
    pub action_name: String,
    /// The single mask bit representing this action.
    pub bit_value: i32,
}

impl ResourceAction {
    /// Construct an action from string-like names and a bit value.
    pub fn new(
        resource_name: impl Into<String>,
        action_name: impl Into<String>,
        bit_value: i32,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            action_name: action_name.into(),
            bit_value,
        }
    }
}

/// An action definition as supplied to a registry: a name plus its bit,
/// without the resource name (the enclosing call carries that).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    /// The action name, unique within the resource type.
    pub name: String,
    /// The single mask bit for this action. Must be a power of two.
    pub bit: i32,
}

impl ActionDef {
    /// Construct a definition from a string-like name and a bit value.
    pub fn new(name: impl Into<String>, bit: i32) -> Self {
        Self { name: name.into(), bit }
    }
}
