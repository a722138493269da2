//! # permit-store
//!
//! Reference in-memory implementations of the permit engine's storage
//! contracts:
//!
//! - [`MemoryGrantStore`] — a mutex-guarded `GrantStore` for tests, demos,
//!   and small embeddings.
//! - [`MemoryRoleDirectory`] — a `RoleDirectory` seeded with the four
//!   built-in roles, plus role management operations.
//!
//! Any storage technology can replace these behind the same traits; these
//! exist so the resolver can be exercised end to end without external
//! infrastructure.

pub mod memory;
pub mod roles;

pub use memory::MemoryGrantStore;
pub use roles::MemoryRoleDirectory;

// ── Tests ─────────────────────────────────────────────────────────────────────
