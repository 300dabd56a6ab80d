//! Authorization module - ordered permission levels
//!
//! This module implements level-based access control with support for:
//! - An ordered, process-wide registry of permission levels
//! - Declarative action -> minimum level tables
//! - Escalation (higher levels inherit everything below them)
//! - Super user bypass and the inactive state
//! - Role metadata for pickers and display
//! - Configurable enforcement modes (off/advisory/strict) at the gate

mod catalog;
mod evaluator;
mod gate;
mod levels;
mod subject;
mod table;

pub use catalog::{
    display_name, RoleCatalog, RoleEntry, RoleScope, SelectOption, DEFAULT_PLACEHOLDER,
    NOT_SPECIFIED_NAME, SUPER_USER_NAME,
};
pub use evaluator::AuthorizationEngine;
pub use gate::{DenialHook, Gate};
pub use levels::{canonicalize, names, LevelRegistry, PermissionLevel};
pub use subject::{Principal, Subject};
pub use table::{Declaration, PermissionTable, PermissionTableBuilder};

use std::sync::OnceLock;

/// Authorization enforcement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthzMode {
    /// No permission checks (development mode)
    Off,
    /// Log denials but allow requests (testing mode)
    Advisory,
    /// Deny requests that fail the check (production mode)
    #[default]
    Strict,
}

impl AuthzMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "off" => AuthzMode::Off,
            "advisory" => AuthzMode::Advisory,
            _ => AuthzMode::Strict,
        }
    }

    pub fn from_env() -> Self {
        static MODE: OnceLock<AuthzMode> = OnceLock::new();
        *MODE.get_or_init(|| AuthzMode::parse(&std::env::var("AUTHZ_MODE").unwrap_or_default()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthzMode::Off => "off",
            AuthzMode::Advisory => "advisory",
            AuthzMode::Strict => "strict",
        }
    }
}
