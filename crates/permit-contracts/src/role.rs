//! Role and principal identity types.
//!
//! The core treats role ids as opaque integers — how roles are assigned to
//! principals is the embedding application's concern. Four roles are built
//! in and must exist in every role directory: Super Admin, Guest, User
//! (a logged-in regular user), and Owner. The Owner role is special: its
//! grants additionally carry the owning principal's identity and are only
//! consulted on an explicit owner check.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub i64);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One role row: an id and its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: RoleId,
    pub name: String,
}

/// The four roles every role directory must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinRole {
    /// Manages every aspect of the embedding system.
    SuperAdmin,
    /// A public principal who is not signed in.
    Guest,
    /// Any signed-in principal.
    RegularUser,
    /// The principal that owns one specific resource instance.
    Owner,
}

impl BuiltinRole {
    /// The canonical directory name for this role.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinRole::SuperAdmin => "Super Admin",
            BuiltinRole::Guest => "Guest",
            BuiltinRole::RegularUser => "User",
            BuiltinRole::Owner => "Owner",
        }
    }
}

/// A principal (user) identity, as referenced by owner grants.
///
/// Embedding systems key their principals by either an integer or a string
/// primary key; both are supported and compare by value. Resource instance
/// keys, by contrast, are always strings — the two identity domains are
/// deliberately separate types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrincipalKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for PrincipalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKey::Int(v) => write!(f, "{}", v),
            PrincipalKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for PrincipalKey {
    fn from(v: i64) -> Self {
        PrincipalKey::Int(v)
    }
}

impl From<&str> for PrincipalKey {
    fn from(s: &str) -> Self {
        PrincipalKey::Text(s.to_string())
    }
}

impl From<String> for PrincipalKey {
    fn from(s: String) -> Self {
        PrincipalKey::Text(s)
    }
}
