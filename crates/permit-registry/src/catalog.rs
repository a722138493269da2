//! Action catalog configuration schema.
//!
//! A `CatalogConfig` is deserialized from TOML and holds the full set of
//! action definitions, in declaration order. Declaration order is
//! significant: it is the definition order `mask_to_names` reports names
//! in.
//!
//! Example:
//! ```toml
//! [[actions]]
//! resource = "user"
//! name = "user.add"
//! bit = 1
//!
//! [[actions]]
//! resource = "user"
//! name = "user.edit"
//! bit = 2
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use permit_contracts::{
    action::ResourceAction,
    error::{PermitError, PermitResult},
};
use permit_core::mask;

/// One catalog row: an action of one resource type and its bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAction {
    /// The resource type, e.g. `"user"`.
    pub resource: String,
    /// The action name, unique within the resource type.
    pub name: String,
    /// The mask bit. Must be a power of two, unique within the resource
    /// type, and no higher than `2^29`.
    pub bit: i32,
}

/// The top-level structure deserialized from a TOML catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// All action definitions, in declaration order.
    #[serde(default)]
    pub actions: Vec<CatalogAction>,
}

impl CatalogConfig {
    /// Check every catalog invariant: non-empty names, valid bit values,
    /// and per-resource name and bit uniqueness.
    ///
    /// The 30-action cap per resource type follows from these: only 30
    /// distinct power-of-two bits exist at or below `2^29`.
    pub fn validate(&self) -> PermitResult<()> {
        let mut seen: HashMap<&str, Vec<&CatalogAction>> = HashMap::new();

        for entry in &self.actions {
            if entry.resource.is_empty() {
                return Err(PermitError::invalid("catalog resource name must not be empty"));
            }
            if entry.name.is_empty() {
                return Err(PermitError::invalid(format!(
                    "catalog action name must not be empty (resource '{}')",
                    entry.resource
                )));
            }
            mask::check_bit_value(entry.bit)?;

            let existing = seen.entry(entry.resource.as_str()).or_default();
            for other in existing.iter() {
                if other.name == entry.name {
                    return Err(PermitError::invalid(format!(
                        "duplicate action name '{}' for resource '{}'",
                        entry.name, entry.resource
                    )));
                }
                if other.bit == entry.bit {
                    return Err(PermitError::invalid(format!(
                        "duplicate bit value {} for resource '{}'",
                        entry.bit, entry.resource
                    )));
                }
            }
            existing.push(entry);
        }

        Ok(())
    }

    /// Group the catalog into per-resource action lists, preserving
    /// declaration order within each resource type.
    pub fn into_actions_by_resource(self) -> HashMap<String, Vec<ResourceAction>> {
        let mut by_resource: HashMap<String, Vec<ResourceAction>> = HashMap::new();
        for entry in self.actions {
            by_resource
                .entry(entry.resource.clone())
                .or_default()
                .push(ResourceAction::new(entry.resource, entry.name, entry.bit));
        }
        by_resource
    }
}
