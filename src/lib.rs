pub mod authz;
pub mod config;
pub mod errors;
pub mod models;

// Re-export the types most call sites need
pub use authz::{
    CollectionContext, CollectionPolicy, CollectionVoter, Principal, RoleProvider,
    SubCollectionRule, WholeCollectionRule,
};
pub use config::{AuthzMode, RolesConfig};
pub use errors::{AuthzError, AuthzResult};
pub use models::{ParentRef, ResourceType, SitePrivilege, SiteUserPrivilege};
