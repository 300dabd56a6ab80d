use anyhow::Result;

use authorize::authz::{
    AuthorizationEngine, LevelRegistry, PermissionLevel, Principal, RoleCatalog, SelectOption,
};

#[test]
fn all_roles_are_listed_in_rank_order() {
    let registry = LevelRegistry::reference();
    let catalog = RoleCatalog::new(&registry);

    let roles = catalog.all_roles();
    assert_eq!(roles.len(), 6);
    assert!(roles.windows(2).all(|pair| pair[0].level < pair[1].level));
    assert_eq!(roles[1].display_name, "Public User");
    assert_eq!(catalog.available_role_names().len(), 6);
}

#[test]
fn role_name_for_every_reference_level() {
    let registry = LevelRegistry::reference();
    let catalog = RoleCatalog::new(&registry);

    let expected = ["Inactive", "Public User", "Author", "Editor", "Publisher", "Administrator"];
    for (rank, name) in expected.iter().enumerate() {
        let subject = Principal::anonymous().with_level(rank as i64);
        assert_eq!(catalog.role_name(&subject), *name);
    }
}

#[test]
fn super_user_and_unset_role_names() {
    let registry = LevelRegistry::reference();
    let catalog = RoleCatalog::new(&registry);

    let unset = Principal::anonymous();
    assert_eq!(catalog.role_name(&unset), "Not Specified");

    // Super users are named as such whatever they store
    assert_eq!(catalog.role_name(&unset.clone().with_super_user(true)), "Super User");
    assert_eq!(
        catalog.role_name(&Principal::anonymous().with_level(5).with_super_user(true)),
        "Super User"
    );
}

#[test]
fn select_options_with_and_without_placeholder() {
    let registry = LevelRegistry::reference();
    let catalog = RoleCatalog::new(&registry);

    let options = catalog.select_options(true, None);
    assert_eq!(options.len(), 7);
    assert_eq!(options.first(), Some(&SelectOption::new("-- Choose Role --", None)));
    assert_eq!(options.last(), Some(&SelectOption::new("Administrator", Some(5))));

    let bare = catalog.select_options(false, None);
    assert_eq!(bare.len(), 6);
    assert_eq!(bare.first(), Some(&SelectOption::new("Inactive", Some(0))));

    let custom = catalog.select_options(true, Some("--"));
    assert_eq!(custom.first(), Some(&SelectOption::new("--", None)));
}

#[test]
fn escalating_per_level_predicates() -> Result<()> {
    let registry = LevelRegistry::reference();
    let engine = AuthorizationEngine::new(&registry);
    let editor = Principal::anonymous().with_level(3);

    assert!(engine.has_at_least(&editor, registry.resolve("public_user")?));
    assert!(engine.has_at_least(&editor, registry.resolve("author")?));
    assert!(engine.has_at_least(&editor, registry.resolve("editor")?));
    assert!(!engine.has_at_least(&editor, registry.resolve("publisher")?));
    assert!(!engine.has_at_least(&editor, registry.resolve("administrator")?));

    let predicates = engine.level_predicates(&editor);
    assert_eq!(predicates.len(), registry.len());

    Ok(())
}

#[test]
fn inactive_state_bypasses_escalation() {
    let registry = LevelRegistry::reference();
    let engine = AuthorizationEngine::new(&registry);

    assert!(engine.is_inactive(&Principal::anonymous()));
    assert!(!engine.is_active(&Principal::anonymous()));
    assert!(!engine.is_inactive(&Principal::anonymous().with_level(1)));
    assert!(!engine.is_inactive(&Principal::anonymous().with_super_user(true)));
}

#[test]
fn catalog_follows_a_custom_registry() -> Result<()> {
    let registry = LevelRegistry::new(
        vec![
            PermissionLevel::new("suspended", -1),
            PermissionLevel::new("reader", 0),
            PermissionLevel::new("site_admin", 10),
        ],
        "suspended",
        "reader",
    )?;
    let catalog = RoleCatalog::new(&registry);

    assert_eq!(
        catalog.available_role_names(),
        vec!["Suspended", "Reader", "Site Admin"]
    );
    assert_eq!(catalog.select_options(false, None)[0], SelectOption::new("Suspended", Some(-1)));

    let scopes: Vec<String> = catalog.scopes().into_iter().map(|scope| scope.name).collect();
    assert_eq!(scopes, vec!["readers", "site_admins"]);

    Ok(())
}
