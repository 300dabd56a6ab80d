use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::errors::{AuthzError, AuthzResult};

static GLOBAL: OnceLock<LevelRegistry> = OnceLock::new();

/// Well-known level names of the reference configuration
pub mod names {
    pub const INACTIVE: &str = "INACTIVE";
    pub const PUBLIC_USER: &str = "PUBLIC_USER";
    pub const AUTHOR: &str = "AUTHOR";
    pub const EDITOR: &str = "EDITOR";
    pub const PUBLISHER: &str = "PUBLISHER";
    pub const ADMINISTRATOR: &str = "ADMINISTRATOR";
}

/// A named rank in the privilege order. Levels compare by rank only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub name: String,
    pub rank: i64,
}

impl PermissionLevel {
    pub fn new(name: &str, rank: i64) -> Self {
        Self {
            name: canonicalize(name),
            rank,
        }
    }
}

impl PartialEq for PermissionLevel {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for PermissionLevel {}

impl PartialOrd for PermissionLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PermissionLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.rank)
    }
}

/// Canonical form used for every level-name lookup: trimmed, upper-case.
pub fn canonicalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// The ordered set of permission levels.
///
/// Built once, validated on construction and read-only afterwards. `default`
/// is the floor every unset subject and unmapped action falls back to;
/// `lowest` is the first level considered active.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<PermissionLevel>,
    default: usize,
    lowest: usize,
}

impl LevelRegistry {
    pub fn new(
        levels: impl IntoIterator<Item = PermissionLevel>,
        default: &str,
        lowest: &str,
    ) -> AuthzResult<Self> {
        let mut levels: Vec<PermissionLevel> = levels
            .into_iter()
            .map(|level| PermissionLevel::new(&level.name, level.rank))
            .collect();

        if levels.is_empty() {
            return Err(AuthzError::invalid_registry("at least one level is required"));
        }

        let mut names = HashSet::new();
        let mut ranks = HashSet::new();
        for level in &levels {
            if level.name.is_empty() {
                return Err(AuthzError::invalid_registry("level names must not be empty"));
            }
            if !names.insert(level.name.clone()) {
                return Err(AuthzError::invalid_registry(format!(
                    "duplicate level name {}",
                    level.name
                )));
            }
            if !ranks.insert(level.rank) {
                return Err(AuthzError::invalid_registry(format!(
                    "duplicate rank {} ({})",
                    level.rank, level.name
                )));
            }
        }

        levels.sort();

        let position = |name: &str| {
            let wanted = canonicalize(name);
            levels
                .iter()
                .position(|level| level.name == wanted)
                .ok_or_else(|| AuthzError::unknown_level(name))
        };
        let default = position(default)?;
        let lowest = position(lowest)?;

        if default != 0 {
            return Err(AuthzError::invalid_registry(format!(
                "default level {} must be the lowest-ranked level",
                levels[default].name
            )));
        }
        Ok(Self {
            levels,
            default,
            lowest,
        })
    }

    /// INACTIVE(0) < PUBLIC_USER(1) < AUTHOR(2) < EDITOR(3) < PUBLISHER(4) < ADMINISTRATOR(5)
    pub fn reference() -> Self {
        let levels = [
            names::INACTIVE,
            names::PUBLIC_USER,
            names::AUTHOR,
            names::EDITOR,
            names::PUBLISHER,
            names::ADMINISTRATOR,
        ]
        .iter()
        .enumerate()
        .map(|(rank, name)| PermissionLevel::new(name, rank as i64))
        .collect();

        Self {
            levels,
            default: 0,
            lowest: 1,
        }
    }

    /// Install the process-wide registry. Must happen before the first call
    /// to [`LevelRegistry::global`]; later attempts fail.
    pub fn install(registry: LevelRegistry) -> AuthzResult<&'static LevelRegistry> {
        GLOBAL
            .set(registry)
            .map_err(|_| AuthzError::invalid_registry("level registry is already initialized"))?;
        tracing::debug!("installed process-wide level registry");
        Ok(Self::global())
    }

    /// The process-wide registry, falling back to [`LevelRegistry::reference`].
    pub fn global() -> &'static LevelRegistry {
        GLOBAL.get_or_init(LevelRegistry::reference)
    }

    pub fn default(&self) -> &PermissionLevel {
        &self.levels[self.default]
    }

    pub fn lowest(&self) -> &PermissionLevel {
        &self.levels[self.lowest]
    }

    /// Look a level up by name, ignoring case and surrounding whitespace.
    pub fn resolve(&self, name: &str) -> AuthzResult<&PermissionLevel> {
        let wanted = canonicalize(name);
        self.levels
            .iter()
            .find(|level| level.name == wanted)
            .ok_or_else(|| AuthzError::unknown_level(name))
    }

    pub fn by_rank(&self, rank: i64) -> Option<&PermissionLevel> {
        self.levels.iter().find(|level| level.rank == rank)
    }

    /// All levels in ascending rank order.
    pub fn all(&self) -> &[PermissionLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
