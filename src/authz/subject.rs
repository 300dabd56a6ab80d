use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the authorization core needs to know about whoever is acting.
///
/// Implemented by the host's own user type; both methods must be side-effect free.
pub trait Subject {
    /// Assigned level rank, `None` when no role has been set.
    fn level(&self) -> Option<i64>;

    /// Super users bypass every level comparison.
    fn is_super_user(&self) -> bool {
        false
    }
}

impl<S: Subject + ?Sized> Subject for &S {
    fn level(&self) -> Option<i64> {
        (**self).level()
    }

    fn is_super_user(&self) -> bool {
        (**self).is_super_user()
    }
}

/// Principal represents the authenticated subject with its assigned level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub level: Option<i64>,
    #[serde(default)]
    pub super_user: bool,
}

impl Principal {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            level: None,
            super_user: false,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(Uuid::nil())
    }

    pub fn with_level(mut self, rank: i64) -> Self {
        self.level = Some(rank);
        self
    }

    pub fn with_super_user(mut self, super_user: bool) -> Self {
        self.super_user = super_user;
        self
    }
}

impl Subject for Principal {
    fn level(&self) -> Option<i64> {
        self.level
    }

    fn is_super_user(&self) -> bool {
        self.super_user
    }
}
