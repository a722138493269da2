//! # permit-core
//!
//! The resolution core of the permit authorization engine: the pure bitmask
//! algebra, the collaborator traits the engine is written against, and the
//! [`PermissionResolver`] that composes them into authorization decisions.
//!
//! The resolver performs no I/O of its own and keeps no state; storage
//! lives behind the [`traits`] and any technology that honors those
//! contracts can back it. Reference in-memory backings live in the
//! `permit-registry` and `permit-store` crates.

pub mod mask;
pub mod resolver;
pub mod traits;

pub use resolver::PermissionResolver;
pub use traits::{ActionRegistry, GrantStore, RoleDirectory};
