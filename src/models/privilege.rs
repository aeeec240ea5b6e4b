use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-site capability levels. Each level above `User` occupies one bit of the
/// association bitmask; levels are independent flags, not a hierarchy, so
/// granting `Admin` does not implicitly grant `Editor`.
///
/// `User` is not a real bit: the mere existence of a `SiteUserPrivilege`
/// record means the user is a member at `User` level. Checks for `User` must
/// therefore test record existence, never `mask & 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitePrivilege {
    User,
    Editor,
    Admin,
}

impl SitePrivilege {
    pub const fn bit(self) -> u32 {
        match self {
            SitePrivilege::User => 0,
            SitePrivilege::Editor => 0b01,
            SitePrivilege::Admin => 0b10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SitePrivilege::User => "user",
            SitePrivilege::Editor => "editor",
            SitePrivilege::Admin => "admin",
        }
    }
}

/// Association record granting a user access to a site. Unique per
/// `(user_id, site_id)`. Created when an administrator grants access;
/// deleted when access is fully revoked. Revoking a single capability bit
/// keeps the record with a reduced mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteUserPrivilege {
    pub id: Uuid,
    pub user_id: Uuid,
    pub site_id: Uuid,
    /// Bitmask of `SitePrivilege` bits above `User`.
    pub privilege: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SiteUserPrivilege {
    /// A fresh membership record at baseline `User` level (empty mask).
    pub fn new(user_id: Uuid, site_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            site_id,
            privilege: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
