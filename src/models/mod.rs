pub mod privilege;
pub mod resource;
pub mod site;

pub use privilege::{SitePrivilege, SiteUserPrivilege};
pub use resource::{ParentRef, ResourceType};
pub use site::Site;
