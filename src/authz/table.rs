use std::collections::BTreeMap;

use serde::Deserialize;

use super::levels::{LevelRegistry, PermissionLevel};
use crate::errors::AuthzResult;

/// One "these actions require at least `level`" line of a table declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Declaration {
    pub level: String,
    pub actions: Vec<String>,
}

impl Declaration {
    pub fn new<I, A>(level: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            level: level.to_string(),
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Action → minimum level lookup for one consumer (controller, handler, command set).
///
/// Actions without an entry require the registry's default level.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    entries: BTreeMap<String, PermissionLevel>,
    default: PermissionLevel,
}

impl PermissionTable {
    pub fn builder(registry: &LevelRegistry) -> PermissionTableBuilder<'_> {
        PermissionTableBuilder {
            registry,
            entries: BTreeMap::new(),
        }
    }

    /// Build a table from `(level, actions)` declarations, applied in order.
    pub fn build<I, N, A, S>(registry: &LevelRegistry, declarations: I) -> AuthzResult<Self>
    where
        I: IntoIterator<Item = (N, A)>,
        N: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        declarations
            .into_iter()
            .try_fold(Self::builder(registry), |builder, (level, actions)| {
                builder.grant(level.as_ref(), actions)
            })
            .map(PermissionTableBuilder::finish)
    }

    pub fn from_declarations(
        registry: &LevelRegistry,
        declarations: &[Declaration],
    ) -> AuthzResult<Self> {
        Self::build(
            registry,
            declarations
                .iter()
                .map(|decl| (decl.level.as_str(), decl.actions.iter().cloned())),
        )
    }

    pub fn required_level(&self, action: &str) -> &PermissionLevel {
        self.entries.get(action).unwrap_or(&self.default)
    }

    /// Explicitly declared level for `action`, without the default fallback.
    pub fn get(&self, action: &str) -> Option<&PermissionLevel> {
        self.entries.get(action)
    }

    pub fn default_level(&self) -> &PermissionLevel {
        &self.default
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PermissionLevel)> {
        self.entries.iter().map(|(action, level)| (action.as_str(), level))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct PermissionTableBuilder<'r> {
    registry: &'r LevelRegistry,
    entries: BTreeMap<String, PermissionLevel>,
}

impl<'r> PermissionTableBuilder<'r> {
    /// Require at least `level` for each of `actions`. A later grant for the
    /// same action replaces the earlier one.
    pub fn grant<A, S>(mut self, level: &str, actions: A) -> AuthzResult<Self>
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let level = self.registry.resolve(level)?.clone();
        for action in actions {
            let action = action.into();
            if let Some(previous) = self.entries.insert(action.clone(), level.clone()) {
                if previous != level {
                    tracing::debug!(
                        action = %action,
                        previous = %previous,
                        level = %level,
                        "permission redeclared, last declaration wins"
                    );
                }
            }
        }
        Ok(self)
    }

    pub fn finish(self) -> PermissionTable {
        PermissionTable {
            entries: self.entries,
            default: self.registry.default().clone(),
        }
    }
}
