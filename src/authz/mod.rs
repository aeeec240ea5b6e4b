//! Authorization subsystem: site-scoped privilege bitmask, role provider and
//! the collection-level voting protocol.
//!
//! The voting protocol answers one question per request: may this actor
//! list/create resources of a given type, either scoped under a parent entity
//! or on the whole collection? Voters consult the role provider and the
//! per-site privilege masks; resource types without a registered policy fail
//! closed.

mod principal;
pub mod privileges;
mod resolver;
mod roles;
mod voters;

pub use principal::Principal;
pub use privileges::{MemorySitePrivilegeStore, SitePrivilegeStore};
pub use resolver::{MemoryResolver, ParentResolver};
pub use roles::RoleProvider;
pub use voters::{
    CollectionContext, CollectionPolicy, CollectionVoter, ParentLink, SubCollectionRule,
    WholeCollectionRule,
};

/// Well-known role names. The authoritative sets come from [`crate::config::RolesConfig`];
/// these constants exist so call sites don't scatter string literals.
pub mod role_names {
    pub const USER: &str = "ROLE_USER";
    pub const EDITOR: &str = "ROLE_EDITOR";
    pub const ADMIN: &str = "ROLE_ADMIN";

    pub const CERAMIC_SPECIALIST: &str = "ROLE_CERAMIC_SPECIALIST";
    pub const ZOO_ARCHAEOLOGIST: &str = "ROLE_ZOO_ARCHAEOLOGIST";
    pub const ARCHAEO_BOTANIST: &str = "ROLE_ARCHAEO_BOTANIST";
    pub const HISTORIAN: &str = "ROLE_HISTORIAN";
    pub const GEO_ARCHAEOLOGIST: &str = "ROLE_GEO_ARCHAEOLOGIST";
    pub const ANTHROPOLOGIST: &str = "ROLE_ANTHROPOLOGIST";
}
