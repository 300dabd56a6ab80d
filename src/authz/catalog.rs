use serde::Serialize;

use super::levels::{LevelRegistry, PermissionLevel};
use super::subject::Subject;
use crate::errors::{AuthzError, AuthzResult};

pub const SUPER_USER_NAME: &str = "Super User";
pub const NOT_SPECIFIED_NAME: &str = "Not Specified";
pub const DEFAULT_PLACEHOLDER: &str = "-- Choose Role --";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleEntry {
    pub level: i64,
    pub display_name: String,
}

/// A `(label, value)` pair for role pickers. The placeholder has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Option<i64>,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Named subset of subjects holding at least `min_rank`, e.g. `editors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleScope {
    pub name: String,
    pub min_rank: i64,
}

impl RoleScope {
    pub fn matches<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        subject.level().is_some_and(|rank| rank >= self.min_rank)
    }
}

/// Presentation metadata derived from a [`LevelRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RoleCatalog<'r> {
    registry: &'r LevelRegistry,
}

impl RoleCatalog<'static> {
    pub fn global() -> Self {
        Self::new(LevelRegistry::global())
    }
}

impl<'r> RoleCatalog<'r> {
    pub fn new(registry: &'r LevelRegistry) -> Self {
        Self { registry }
    }

    pub fn all_roles(&self) -> Vec<RoleEntry> {
        self.registry
            .all()
            .iter()
            .map(|level| RoleEntry {
                level: level.rank,
                display_name: display_name(level),
            })
            .collect()
    }

    pub fn role_name<S: Subject + ?Sized>(&self, subject: &S) -> String {
        if subject.is_super_user() {
            return SUPER_USER_NAME.to_string();
        }

        subject
            .level()
            .and_then(|rank| self.registry.by_rank(rank))
            .map(display_name)
            .unwrap_or_else(|| NOT_SPECIFIED_NAME.to_string())
    }

    /// Roles as picker options ascending by rank, optionally preceded by a
    /// placeholder (defaults to [`DEFAULT_PLACEHOLDER`]).
    pub fn select_options(&self, include_placeholder: bool, placeholder: Option<&str>) -> Vec<SelectOption> {
        let roles = self
            .all_roles()
            .into_iter()
            .map(|role| SelectOption::new(role.display_name, Some(role.level)));

        if include_placeholder {
            let placeholder = SelectOption::new(placeholder.unwrap_or(DEFAULT_PLACEHOLDER), None);
            std::iter::once(placeholder).chain(roles).collect()
        } else {
            roles.collect()
        }
    }

    pub fn available_role_names(&self) -> Vec<String> {
        self.all_roles()
            .into_iter()
            .map(|role| role.display_name)
            .collect()
    }

    /// One scope per level above the default; the default level has none.
    pub fn scopes(&self) -> Vec<RoleScope> {
        let default = self.registry.default();
        self.registry
            .all()
            .iter()
            .filter(|level| *level != default)
            .map(|level| RoleScope {
                name: pluralize(&level.name.to_lowercase()),
                min_rank: level.rank,
            })
            .collect()
    }

    pub fn scope(&self, name: &str) -> AuthzResult<RoleScope> {
        let wanted = name.trim().to_lowercase();
        self.scopes()
            .into_iter()
            .find(|scope| scope.name == wanted)
            .ok_or_else(|| AuthzError::unknown_level(name))
    }

    /// Subjects belonging to the named scope, in input order.
    pub fn members<'s, S: Subject>(&self, scope: &str, subjects: &'s [S]) -> AuthzResult<Vec<&'s S>> {
        let scope = self.scope(scope)?;
        Ok(subjects.iter().filter(|subject| scope.matches(*subject)).collect())
    }
}

/// `PUBLIC_USER` -> `Public User`
pub fn display_name(level: &PermissionLevel) -> String {
    level
        .name
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::subject::Principal;

    #[test]
    fn test_display_names() {
        let registry = LevelRegistry::reference();
        let catalog = RoleCatalog::new(&registry);

        assert_eq!(
            catalog.available_role_names(),
            vec!["Inactive", "Public User", "Author", "Editor", "Publisher", "Administrator"]
        );
    }

    #[test]
    fn test_role_name() {
        let registry = LevelRegistry::reference();
        let catalog = RoleCatalog::new(&registry);

        assert_eq!(catalog.role_name(&Principal::anonymous().with_level(4)), "Publisher");
        assert_eq!(catalog.role_name(&Principal::anonymous().with_level(1)), "Public User");
        assert_eq!(catalog.role_name(&Principal::anonymous().with_level(0)), "Inactive");
        assert_eq!(catalog.role_name(&Principal::anonymous()), "Not Specified");
        assert_eq!(catalog.role_name(&Principal::anonymous().with_level(99)), "Not Specified");
        assert_eq!(
            catalog.role_name(&Principal::anonymous().with_level(2).with_super_user(true)),
            "Super User"
        );
    }

    #[test]
    fn test_select_options() {
        let registry = LevelRegistry::reference();
        let catalog = RoleCatalog::new(&registry);

        let with_placeholder = catalog.select_options(true, None);
        assert_eq!(with_placeholder.len(), 7);
        assert_eq!(with_placeholder[0], SelectOption::new("-- Choose Role --", None));

        let without = catalog.select_options(false, None);
        assert_eq!(without.len(), 6);
        assert_eq!(without[0], SelectOption::new("Inactive", Some(0)));
        assert!(without.windows(2).all(|w| w[0].value < w[1].value));

        let custom = catalog.select_options(true, Some("--"));
        assert_eq!(custom[0], SelectOption::new("--", None));
    }

    #[test]
    fn test_scopes_skip_default_level() {
        let registry = LevelRegistry::reference();
        let catalog = RoleCatalog::new(&registry);

        let names: Vec<String> = catalog.scopes().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["public_users", "authors", "editors", "publishers", "administrators"]
        );
        assert!(catalog.scope("inactives").is_err());
    }

    #[test]
    fn test_scope_members() {
        let registry = LevelRegistry::reference();
        let catalog = RoleCatalog::new(&registry);
        let subjects = vec![
            Principal::anonymous().with_level(1),
            Principal::anonymous().with_level(3),
            Principal::anonymous(),
            Principal::anonymous().with_level(5),
        ];

        let editors = catalog.members("editors", &subjects).unwrap();
        let ranks: Vec<Option<i64>> = editors.iter().map(|p| p.level).collect();
        assert_eq!(ranks, vec![Some(3), Some(5)]);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("deputy"), "deputies");
        assert_eq!(pluralize("boss"), "bosses");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("editor"), "editors");
    }
}
