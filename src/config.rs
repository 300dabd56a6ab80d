use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::authz::{names, Declaration, LevelRegistry, PermissionLevel, PermissionTable};
use crate::errors::{AuthzError, AuthzResult};

pub const CONFIG_ENV: &str = "AUTHORIZE_CONFIG";

/// Levels and permission tables as declared by the embedding application.
///
/// ```json
/// {
///   "levels": [{"name": "GUEST", "rank": 0}, {"name": "MEMBER", "rank": 1}],
///   "default": "guest",
///   "lowest": "member",
///   "tables": {
///     "articles": [{"level": "member", "actions": ["index"]}]
///   }
/// }
/// ```
///
/// `levels` may be omitted to use the reference registry. Declarations within
/// a table are applied in file order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizeConfig {
    #[serde(default)]
    pub levels: Option<Vec<PermissionLevel>>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub lowest: Option<String>,
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<Declaration>>,
}

impl AuthorizeConfig {
    pub fn from_json(input: &str) -> AuthzResult<Self> {
        let de = &mut serde_json::Deserializer::from_str(input);
        Ok(serde_path_to_error::deserialize(de)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AuthzResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            AuthzError::configuration(format!("failed to read {}: {err}", path.display()))
        })?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), tables = config.tables.len(), "loaded authorization config");
        Ok(config)
    }

    /// Path from `AUTHORIZE_CONFIG`, if set.
    pub fn path_from_env() -> Option<PathBuf> {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn registry(&self) -> AuthzResult<LevelRegistry> {
        let Some(levels) = &self.levels else {
            if self.default.is_none() && self.lowest.is_none() {
                return Ok(LevelRegistry::reference());
            }
            return LevelRegistry::new(
                LevelRegistry::reference().all().iter().cloned(),
                self.default.as_deref().unwrap_or(names::INACTIVE),
                self.lowest.as_deref().unwrap_or(names::PUBLIC_USER),
            );
        };

        let mut sorted = levels.clone();
        sorted.sort();
        let default = match &self.default {
            Some(name) => name.clone(),
            None => sorted
                .first()
                .map(|level| level.name.clone())
                .ok_or_else(|| AuthzError::invalid_registry("at least one level is required"))?,
        };
        let lowest = match &self.lowest {
            Some(name) => name.clone(),
            None => sorted
                .get(1)
                .or_else(|| sorted.first())
                .map(|level| level.name.clone())
                .unwrap_or_default(),
        };

        LevelRegistry::new(sorted, &default, &lowest)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn table(&self, registry: &LevelRegistry, name: &str) -> AuthzResult<PermissionTable> {
        let declarations = self
            .tables
            .get(name)
            .ok_or_else(|| AuthzError::configuration(format!("unknown permission table `{name}`")))?;
        PermissionTable::from_declarations(registry, declarations)
    }

    /// Build every declared table; the first bad declaration fails the whole load.
    pub fn tables(&self, registry: &LevelRegistry) -> AuthzResult<BTreeMap<String, PermissionTable>> {
        self.tables
            .iter()
            .map(|(name, declarations)| {
                PermissionTable::from_declarations(registry, declarations)
                    .map(|table| (name.clone(), table))
            })
            .collect()
    }
}
