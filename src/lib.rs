pub mod authz;
pub mod config;
pub mod errors;

// Re-export commonly used items
pub use authz::{
    AuthorizationEngine, AuthzMode, Gate, LevelRegistry, PermissionLevel, PermissionTable, Principal,
    RoleCatalog, Subject,
};
pub use config::AuthorizeConfig;
pub use errors::{AuthzError, AuthzResult};
