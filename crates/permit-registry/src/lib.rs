//! # permit-registry
//!
//! The two interchangeable `ActionRegistry` backings for the permit
//! engine:
//!
//! - [`CatalogActionRegistry`] — immutable, sourced from a TOML catalog
//!   file at startup. Mutating calls fail with `UnsupportedOperation`.
//! - [`MemoryActionRegistry`] — a live, administrable in-memory registry
//!   implementing the full mutation contract.
//!
//! Both satisfy the same read contract and error behavior; the embedding
//! application selects one at construction and hands it to the resolver.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use permit_registry::CatalogActionRegistry;
//!
//! let registry = CatalogActionRegistry::from_file(Path::new("config/actions.toml"))?;
//! // Pass `registry` to `permit_core::PermissionResolver::new(...)`.
//! ```

pub mod catalog;
pub mod fixed;
pub mod memory;

pub use catalog::{CatalogAction, CatalogConfig};
pub use fixed::CatalogActionRegistry;
pub use memory::MemoryActionRegistry;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use permit_contracts::{action::ActionDef, error::PermitError};
    use permit_core::traits::ActionRegistry;

    use crate::{CatalogActionRegistry, CatalogConfig, MemoryActionRegistry};

    // ── Helpers ───────────────────────────────────────────────────────────────

    const USER_CRUD: &str = r#"
        [[actions]]
        resource = "user"
        name = "user.add"
        bit = 1

        [[actions]]
        resource = "user"
        name = "user.edit"
        bit = 2

        [[actions]]
        resource = "user"
        name = "user.delete"
        bit = 4

        [[actions]]
        resource = "user"
        name = "user.view"
        bit = 8
    "#;

    fn catalog() -> CatalogActionRegistry {
        CatalogActionRegistry::from_toml_str(USER_CRUD).unwrap()
    }

    fn user_crud_defs() -> Vec<ActionDef> {
        vec![
            ActionDef::new("user.add", 1),
            ActionDef::new("user.edit", 2),
            ActionDef::new("user.delete", 4),
            ActionDef::new("user.view", 8),
        ]
    }

    // ── 1. catalog loading ────────────────────────────────────────────────────

    #[test]
    fn catalog_loads_actions_in_declaration_order() {
        let registry = catalog();
        let actions = registry.list_actions("user").unwrap();
        let names: Vec<&str> = actions.iter().map(|a| a.action_name.as_str()).collect();
        assert_eq!(names, ["user.add", "user.edit", "user.delete", "user.view"]);
    }

    #[test]
    fn malformed_toml_is_an_invalid_argument() {
        let result = CatalogActionRegistry::from_toml_str("this is not toml ][[[");
        match result {
            Err(PermitError::InvalidArgument { reason }) => {
                assert!(reason.contains("failed to parse action catalog TOML"));
            }
            other => panic!("expected InvalidArgument, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_catalog_is_valid() {
        let registry = CatalogActionRegistry::from_toml_str("").unwrap();
        assert!(registry.list_actions("user").unwrap().is_empty());
    }

    // ── 2. catalog validation ─────────────────────────────────────────────────

    #[test]
    fn duplicate_action_names_are_rejected() {
        let toml = r#"
            [[actions]]
            resource = "user"
            name = "user.add"
            bit = 1

            [[actions]]
            resource = "user"
            name = "user.add"
            bit = 2
        "#;
        let err = CatalogActionRegistry::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate action name"));
    }

    #[test]
    fn duplicate_bit_values_are_rejected() {
        let toml = r#"
            [[actions]]
            resource = "user"
            name = "user.add"
            bit = 1

            [[actions]]
            resource = "user"
            name = "user.edit"
            bit = 1
        "#;
        let err = CatalogActionRegistry::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate bit value"));
    }

    /// The same name or bit on different resource types is no conflict.
    #[test]
    fn uniqueness_is_scoped_per_resource_type() {
        let toml = r#"
            [[actions]]
            resource = "user"
            name = "view"
            bit = 1

            [[actions]]
            resource = "post"
            name = "view"
            bit = 1
        "#;
        let registry = CatalogActionRegistry::from_toml_str(toml).unwrap();
        assert!(registry.exists("user", "view").unwrap());
        assert!(registry.exists("post", "view").unwrap());
    }

    #[test]
    fn non_power_of_two_bits_are_rejected() {
        let toml = r#"
            [[actions]]
            resource = "user"
            name = "user.add"
            bit = 3
        "#;
        let err = CatalogActionRegistry::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("power of two"));
    }

    /// 30 actions (bits 2^0..2^29) are the most one resource type can
    /// hold; bit 2^30 sits in the reserved range and is rejected.
    #[test]
    fn catalog_caps_a_resource_at_thirty_actions() {
        let mut toml = String::new();
        for shift in 0..30 {
            toml.push_str(&format!(
                "[[actions]]\nresource = \"wide\"\nname = \"a{shift}\"\nbit = {}\n\n",
                1i32 << shift
            ));
        }
        let registry = CatalogActionRegistry::from_toml_str(&toml).unwrap();
        assert_eq!(registry.list_actions("wide").unwrap().len(), 30);

        toml.push_str(&format!(
            "[[actions]]\nresource = \"wide\"\nname = \"a30\"\nbit = {}\n",
            1i64 << 30
        ));
        let err = CatalogActionRegistry::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, PermitError::InvalidArgument { .. }));
    }

    // ── 3. read contract (both backings) ──────────────────────────────────────

    #[test]
    fn resolve_is_strict_about_unknown_actions() {
        let registry = catalog();
        let err = registry.resolve("user", "user.fly").unwrap_err();
        assert!(matches!(err, PermitError::UnknownAction { .. }));

        let memory = MemoryActionRegistry::new();
        memory.define_all("user", &user_crud_defs()).unwrap();
        let err = memory.resolve("user", "user.fly").unwrap_err();
        assert!(matches!(err, PermitError::UnknownAction { .. }));
    }

    #[test]
    fn unknown_resource_lists_empty_not_error() {
        assert!(catalog().list_actions("blog_post").unwrap().is_empty());
        assert!(MemoryActionRegistry::new().list_actions("blog_post").unwrap().is_empty());
    }

    /// edit|view == 10, and back to names in definition order.
    #[test]
    fn names_and_mask_round_trip_in_definition_order() {
        let registry = catalog();
        let mask = registry.names_to_mask("user", &["user.view", "user.edit"]).unwrap();
        assert_eq!(mask, 10);

        let names = registry.mask_to_names("user", 10).unwrap();
        assert_eq!(names, ["user.edit", "user.view"]);
    }

    /// `names_to_mask` is lenient: unknown names are skipped, not errors.
    #[test]
    fn names_to_mask_skips_unknown_names() {
        let registry = catalog();
        let mask = registry.names_to_mask("user", &["user.edit", "no.such.action"]).unwrap();
        assert_eq!(mask, 2);
        assert_eq!(registry.names_to_mask("user", &[]).unwrap(), 0);
    }

    #[test]
    fn mask_to_names_ignores_undefined_bits() {
        let registry = catalog();
        // Bit 16 is undefined for "user"; only defined bits are reported.
        let names = registry.mask_to_names("user", 16 | 8).unwrap();
        assert_eq!(names, ["user.view"]);
    }

    // ── 4. the immutable backing rejects mutation ─────────────────────────────

    #[test]
    fn catalog_registry_rejects_every_mutator() {
        let registry = catalog();
        let defs = user_crud_defs();

        assert!(matches!(
            registry.define("user", "user.fly", 16).unwrap_err(),
            PermitError::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            registry.define_all("user", &defs).unwrap_err(),
            PermitError::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            registry.undefine("user", "user.add").unwrap_err(),
            PermitError::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            registry.undefine_all("user").unwrap_err(),
            PermitError::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            registry.redefine("user", &defs).unwrap_err(),
            PermitError::UnsupportedOperation { .. }
        ));
    }

    // ── 5. the mutable backing ────────────────────────────────────────────────

    /// Defining the same action twice reports "already present" the second
    /// time and leaves the catalog unchanged.
    #[test]
    fn define_is_idempotent() {
        let registry = MemoryActionRegistry::new();
        assert!(registry.define("user", "user.add", 1).unwrap());
        assert!(!registry.define("user", "user.add", 1).unwrap());
        assert_eq!(registry.list_actions("user").unwrap().len(), 1);
    }

    /// A clashing bit value under a new name is also "already present".
    #[test]
    fn define_treats_bit_collisions_as_already_present() {
        let registry = MemoryActionRegistry::new();
        assert!(registry.define("user", "user.add", 1).unwrap());
        assert!(!registry.define("user", "user.create", 1).unwrap());
        assert!(!registry.exists("user", "user.create").unwrap());
    }

    #[test]
    fn define_validates_the_bit_before_any_change() {
        let registry = MemoryActionRegistry::new();
        assert!(registry.define("user", "user.add", 6).is_err());
        assert!(registry.list_actions("user").unwrap().is_empty());
    }

    #[test]
    fn define_all_reports_whether_anything_was_added() {
        let registry = MemoryActionRegistry::new();
        assert!(registry.define_all("user", &user_crud_defs()).unwrap());
        // Second bulk define adds nothing.
        assert!(!registry.define_all("user", &user_crud_defs()).unwrap());
        assert_eq!(registry.list_actions("user").unwrap().len(), 4);
    }

    #[test]
    fn undefine_reports_whether_anything_was_removed() {
        let registry = MemoryActionRegistry::new();
        registry.define_all("user", &user_crud_defs()).unwrap();

        assert!(registry.undefine("user", "user.add").unwrap());
        assert!(!registry.undefine("user", "user.add").unwrap());
        assert!(!registry.exists("user", "user.add").unwrap());
    }

    #[test]
    fn undefine_all_counts_removed_actions() {
        let registry = MemoryActionRegistry::new();
        registry.define_all("user", &user_crud_defs()).unwrap();

        assert_eq!(registry.undefine_all("user").unwrap(), 4);
        assert_eq!(registry.undefine_all("user").unwrap(), 0);
        assert!(registry.list_actions("user").unwrap().is_empty());
    }

    #[test]
    fn redefine_replaces_the_whole_resource_catalog() {
        let registry = MemoryActionRegistry::new();
        registry.define_all("user", &user_crud_defs()).unwrap();

        let replacement = vec![ActionDef::new("user.read", 1), ActionDef::new("user.write", 2)];
        registry.redefine("user", &replacement).unwrap();

        let names: Vec<String> = registry
            .list_actions("user")
            .unwrap()
            .into_iter()
            .map(|a| a.action_name)
            .collect();
        assert_eq!(names, ["user.read", "user.write"]);
    }

    #[test]
    fn memory_registry_caps_a_resource_at_thirty_actions() {
        let registry = MemoryActionRegistry::new();
        for shift in 0..30 {
            assert!(registry.define("wide", &format!("a{shift}"), 1 << shift).unwrap());
        }
        // All 30 legal bits are taken: a new name on a taken bit is
        // "already present", and the reserved bit 2^30 is out of range.
        assert!(!registry.define("wide", "one-too-many", 1).unwrap());
        assert!(registry.define("wide", "one-too-many", 1 << 30).is_err());
        assert_eq!(registry.list_actions("wide").unwrap().len(), 30);
    }

    #[test]
    fn memory_registry_seeds_from_a_catalog() {
        let config: CatalogConfig = toml::from_str(USER_CRUD).unwrap();
        let registry = MemoryActionRegistry::with_catalog(config).unwrap();
        assert_eq!(registry.names_to_mask("user", &["user.view", "user.edit"]).unwrap(), 10);
        // Still administrable.
        assert!(registry.define("user", "user.ban", 16).unwrap());
    }
}
