use super::levels::{LevelRegistry, PermissionLevel};
use super::subject::Subject;
use super::table::PermissionTable;

/// Level-based authorization decisions
///
/// Evaluation order for an action:
/// 1. super user -> allow
/// 2. action requires the lowest active level -> allow
/// 3. subject level >= required level -> allow
/// 4. deny
///
/// A subject without a level is evaluated as if it held the registry default.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationEngine<'r> {
    registry: &'r LevelRegistry,
}

impl AuthorizationEngine<'static> {
    /// Engine bound to the process-wide registry.
    pub fn global() -> Self {
        Self::new(LevelRegistry::global())
    }
}

impl<'r> AuthorizationEngine<'r> {
    pub fn new(registry: &'r LevelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r LevelRegistry {
        self.registry
    }

    fn rank_of<S: Subject + ?Sized>(&self, subject: &S) -> i64 {
        subject.level().unwrap_or(self.registry.default().rank)
    }

    pub fn is_authorized<S: Subject + ?Sized>(
        &self,
        subject: &S,
        action: &str,
        table: &PermissionTable,
    ) -> bool {
        if subject.is_super_user() {
            tracing::debug!(action = %action, "super_user bypass");
            return true;
        }

        let required = table.required_level(action);
        let rank = self.rank_of(subject);

        // Kept as its own branch: anything requiring the active floor is open
        // to every subject, independent of the rank comparison below.
        if required == self.registry.lowest() {
            tracing::debug!(action = %action, rank, required = %required, "lowest level match");
            return true;
        }

        if rank >= required.rank {
            tracing::debug!(action = %action, rank, required = %required, "level match");
            return true;
        }

        tracing::debug!(action = %action, rank, required = %required, "permission denied");
        false
    }

    /// Inactive means holding exactly the default level. Equality, not `>=`,
    /// since every subject satisfies `>= default`.
    pub fn is_inactive<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        if subject.is_super_user() {
            return false;
        }
        self.rank_of(subject) == self.registry.default().rank
    }

    pub fn is_active<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        !self.is_inactive(subject)
    }

    pub fn has_at_least<S: Subject + ?Sized>(&self, subject: &S, level: &PermissionLevel) -> bool {
        subject.is_super_user() || self.rank_of(subject) >= level.rank
    }

    /// Like [`has_at_least`](Self::has_at_least), resolving the level by name.
    pub fn has_at_least_named<S: Subject + ?Sized>(
        &self,
        subject: &S,
        level: &str,
    ) -> crate::errors::AuthzResult<bool> {
        let level = self.registry.resolve(level)?;
        Ok(self.has_at_least(subject, level))
    }

    /// `has_at_least` evaluated for every registered level, ascending.
    pub fn level_predicates<S: Subject + ?Sized>(&self, subject: &S) -> Vec<(&'r PermissionLevel, bool)> {
        self.registry
            .all()
            .iter()
            .map(|level| (level, self.has_at_least(subject, level)))
            .collect()
    }

    /// Run `f` only when the subject holds at least `level`.
    pub fn when_at_least<S, F, T>(&self, subject: &S, level: &PermissionLevel, f: F) -> Option<T>
    where
        S: Subject + ?Sized,
        F: FnOnce() -> T,
    {
        self.has_at_least(subject, level).then(f)
    }

    /// Run `f` only for super users.
    pub fn when_super_user<S, F, T>(&self, subject: &S, f: F) -> Option<T>
    where
        S: Subject + ?Sized,
        F: FnOnce() -> T,
    {
        subject.is_super_user().then(f)
    }
}
