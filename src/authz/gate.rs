use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::evaluator::AuthorizationEngine;
use super::subject::Subject;
use super::table::PermissionTable;
use super::AuthzMode;
use crate::errors::{AuthzError, AuthzResult};

/// Callback the gate invokes for every denied check.
pub type DenialHook = Box<dyn Fn(&dyn Subject, &str) + Send + Sync>;

/// Host-facing guard around one permission table.
///
/// The table sits behind an atomic pointer so [`Gate::reload`] never exposes a
/// half-built table to concurrent checks. What happens after a denial (a 403,
/// a redirect, an error) is left to the `on_denied` hook and the caller.
pub struct Gate<'r> {
    engine: AuthorizationEngine<'r>,
    table: ArcSwap<PermissionTable>,
    mode: AuthzMode,
    on_denied: Option<DenialHook>,
}

impl<'r> Gate<'r> {
    pub fn new(engine: AuthorizationEngine<'r>, table: PermissionTable) -> Self {
        Self {
            engine,
            table: ArcSwap::from_pointee(table),
            mode: AuthzMode::Strict,
            on_denied: None,
        }
    }

    pub fn with_mode(mut self, mode: AuthzMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn on_denied<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn Subject, &str) + Send + Sync + 'static,
    {
        self.on_denied = Some(Box::new(hook));
        self
    }

    pub fn mode(&self) -> AuthzMode {
        self.mode
    }

    pub fn engine(&self) -> AuthorizationEngine<'r> {
        self.engine
    }

    /// Snapshot of the current table.
    pub fn table(&self) -> Arc<PermissionTable> {
        self.table.load_full()
    }

    /// Swap in a new table; checks already running keep the old one.
    pub fn reload(&self, table: PermissionTable) {
        self.table.store(Arc::new(table));
        tracing::info!("permission table reloaded");
    }

    /// Decide whether `action` may proceed for `subject` under the gate's mode.
    pub fn check(&self, subject: &dyn Subject, action: &str) -> bool {
        if self.mode == AuthzMode::Off {
            return true;
        }

        let table = self.table.load();
        if self.engine.is_authorized(subject, action, &table) {
            return true;
        }

        if let Some(hook) = &self.on_denied {
            hook(subject, action);
        }

        match self.mode {
            AuthzMode::Advisory => {
                tracing::warn!(action = %action, level = ?subject.level(), "permission denied (advisory)");
                true
            }
            _ => {
                tracing::info!(action = %action, level = ?subject.level(), "permission denied");
                false
            }
        }
    }

    /// [`check`](Self::check) as a `Result`, for hosts that propagate denials with `?`.
    pub fn ensure(&self, subject: &dyn Subject, action: &str) -> AuthzResult<()> {
        if self.check(subject, action) {
            Ok(())
        } else {
            Err(AuthzError::forbidden(action))
        }
    }
}

impl fmt::Debug for Gate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("mode", &self.mode)
            .field("actions", &self.table.load().len())
            .field("on_denied", &self.on_denied.is_some())
            .finish()
    }
}
