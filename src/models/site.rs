use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resource::{ParentRef, ResourceType};

/// An archaeological site, the ownership root of every scoped resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    /// Short excavation code, e.g. "ED" or "TS".
    pub code: String,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    pub fn new(code: impl Into<String>, name: impl Into<String>, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            name: name.into(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Site> for ParentRef {
    fn from(site: &Site) -> Self {
        ParentRef::new(ResourceType::Site, site.id, site.id, site.created_by)
    }
}
