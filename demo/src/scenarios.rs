//! Demo scenarios wiring real permit components together.
//!
//! Each scenario builds a [`PermissionResolver`] over the TOML action
//! catalog, the in-memory grant store, and the seeded role directory, then
//! walks through one aspect of the resolution algorithm, printing every
//! decision.

use tracing::info;

use permit_contracts::{
    error::PermitResult,
    grant::Scope,
    role::{PrincipalKey, RoleId},
};
use permit_core::traits::RoleDirectory;
use permit_core::PermissionResolver;
use permit_registry::CatalogActionRegistry;
use permit_store::{MemoryGrantStore, MemoryRoleDirectory};

/// The user CRUD catalog every scenario runs against.
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

struct Demo {
    resolver: PermissionResolver,
    super_admin: RoleId,
    guest: RoleId,
    user: RoleId,
}

fn wire() -> PermitResult<Demo> {
    let roles = MemoryRoleDirectory::new();
    let super_admin = roles.super_admin_role_id()?;
    let guest = roles.guest_role_id()?;
    let user = roles.regular_user_role_id()?;

    let resolver = PermissionResolver::new(
        Box::new(CatalogActionRegistry::from_toml_str(USER_CRUD)?),
        Box::new(MemoryGrantStore::new()),
        Box::new(roles),
    );

    Ok(Demo { resolver, super_admin, guest, user })
}

fn report(label: &str, outcome: bool) {
    println!("  {:<62} {}", label, if outcome { "ALLOWED" } else { "denied" });
}

/// The reference grant set, end to end: Guest may do nothing, User may
/// view, Super Admin may do everything, and principal 5 owns user
/// instance "5" with edit+view.
pub fn end_to_end() -> PermitResult<()> {
    println!("=== end-to-end ===");
    let demo = wire()?;
    let r = &demo.resolver;

    r.set_permissions(demo.guest, 0, "user", Scope::All, None)?;
    r.set_permissions_by_names(demo.user, &["user.view"], "user", Scope::All, None)?;
    r.set_permissions_by_names(
        demo.super_admin,
        &["user.add", "user.edit", "user.delete", "user.view"],
        "user",
        Scope::All,
        None,
    )?;
    let me = PrincipalKey::Int(5);
    r.set_owner_permissions_by_names(&me, &["user.edit", "user.view"], "user", "5")?;

    info!(grants = r.grants("user", Scope::All, None)?.len(), "grant set seeded");

    report(
        "super admin deletes any user",
        r.authorize(&[demo.super_admin], "user.delete", "user", None, None)?,
    );
    report(
        "guest views the user list",
        r.authorize(&[demo.guest], "user.view", "user", None, None)?,
    );
    report(
        "user 5 edits their own record (owner check)",
        r.authorize(&[demo.user], "user.edit", "user", Some("5"), Some(&me))?,
    );
    report(
        "user 5 deletes their own record (owner check)",
        r.authorize(&[demo.user], "user.delete", "user", Some("5"), Some(&me))?,
    );

    let owner_grant = r.owner_grant("user", "5")?;
    println!("  owner grant row: {}", serde_json::to_string(&owner_grant).unwrap_or_default());
    Ok(())
}

/// Resource-wide and per-instance grants union: view everywhere, edit
/// only on instance "5".
pub fn scope_union() -> PermitResult<()> {
    println!("=== scope-union ===");
    let demo = wire()?;
    let r = &demo.resolver;

    r.set_permissions_by_names(demo.user, &["user.view"], "user", Scope::All, None)?;
    r.set_permissions_by_names(demo.user, &["user.edit"], "user", Scope::Instance, Some("5"))?;

    report(
        "view at resource-wide scope",
        r.authorize_at_scope(&[demo.user], "user.view", "user", Scope::All, None)?,
    );
    report(
        "edit at resource-wide scope",
        r.authorize_at_scope(&[demo.user], "user.edit", "user", Scope::All, None)?,
    );
    report(
        "edit at instance \"5\"",
        r.authorize_at_scope(&[demo.user], "user.edit", "user", Scope::Instance, Some("5"))?,
    );
    report(
        "edit on instance \"5\" via the scope walk",
        r.authorize(&[demo.user], "user.edit", "user", Some("5"), None)?,
    );
    report(
        "delete on instance \"5\" via the scope walk",
        r.authorize(&[demo.user], "user.delete", "user", Some("5"), None)?,
    );
    Ok(())
}

/// Owner grants are reachable only through the explicit owner check, and
/// only for the matching principal.
pub fn owner_bypass() -> PermitResult<()> {
    println!("=== owner-bypass ===");
    let demo = wire()?;
    let r = &demo.resolver;

    let me = PrincipalKey::Int(4);
    r.set_owner_permissions_by_names(&me, &["user.edit", "user.view"], "user", "4")?;

    report(
        "owner check with the owning principal",
        r.authorize(&[demo.user], "user.edit", "user", Some("4"), Some(&me))?,
    );
    let stranger = PrincipalKey::Int(9);
    report(
        "owner check with a different principal",
        r.authorize(&[demo.user], "user.edit", "user", Some("4"), Some(&stranger))?,
    );
    report(
        "the same action without an owner check",
        r.authorize(&[demo.user], "user.edit", "user", Some("4"), None)?,
    );
    Ok(())
}
