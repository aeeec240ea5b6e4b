use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AuthzError;

/// Catalog resource types guarded by collection-level authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Site,
    Area,
    Context,
    StratigraphicUnit,
    Pottery,
    Sample,
    MediaObject,
    User,
    SiteUserPrivilege,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Site => "site",
            ResourceType::Area => "area",
            ResourceType::Context => "context",
            ResourceType::StratigraphicUnit => "stratigraphic_unit",
            ResourceType::Pottery => "pottery",
            ResourceType::Sample => "sample",
            ResourceType::MediaObject => "media_object",
            ResourceType::User => "user",
            ResourceType::SiteUserPrivilege => "site_user_privilege",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "site" => Ok(ResourceType::Site),
            "area" => Ok(ResourceType::Area),
            "context" => Ok(ResourceType::Context),
            "stratigraphic_unit" => Ok(ResourceType::StratigraphicUnit),
            "pottery" => Ok(ResourceType::Pottery),
            "sample" => Ok(ResourceType::Sample),
            "media_object" => Ok(ResourceType::MediaObject),
            "user" => Ok(ResourceType::User),
            "site_user_privilege" => Ok(ResourceType::SiteUserPrivilege),
            other => Err(AuthzError::unknown_resource(other)),
        }
    }
}

/// Lazy reference to a parent entity. Carries only the identity and ownership
/// facts voters compare against; attribute state is never loaded for a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub resource_type: ResourceType,
    pub id: Uuid,
    /// The site owning the parent. For a site this is the site's own id.
    pub site_id: Uuid,
    pub created_by: Uuid,
}

impl ParentRef {
    pub fn new(resource_type: ResourceType, id: Uuid, site_id: Uuid, created_by: Uuid) -> Self {
        Self {
            resource_type,
            id,
            site_id,
            created_by,
        }
    }
}
