//! Bitmask operations over site privileges and the persisted-mask lookup seam.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AuthzResult;
use crate::models::privilege::{SitePrivilege, SiteUserPrivilege};

/// Tests a capability level against an association mask.
///
/// `None` means no association record exists, which denies every level.
/// `User` is satisfied by the existence of the association alone, even with an
/// empty mask: its value is 0, and `mask & 0` would otherwise deny a member
/// the baseline level they hold by definition. This short-circuit is
/// deliberate; do not replace it with the generic bit test.
pub fn has_privilege(mask: Option<u32>, level: SitePrivilege) -> bool {
    let Some(mask) = mask else {
        return false;
    };
    if level == SitePrivilege::User {
        return true;
    }
    mask & level.bit() != 0
}

/// Returns the mask with `level`'s bit set. Idempotent; sets only the named
/// bit, so granting `Admin` leaves `Editor` untouched.
pub fn grant(mask: u32, level: SitePrivilege) -> u32 {
    mask | level.bit()
}

/// Returns the mask with `level`'s bit cleared. Revoking an unset bit is a
/// no-op.
pub fn revoke(mask: u32, level: SitePrivilege) -> u32 {
    mask & !level.bit()
}

/// Grants `level` on the association record in place and returns the new mask.
pub fn grant_on(record: &mut SiteUserPrivilege, level: SitePrivilege) -> u32 {
    record.privilege = grant(record.privilege, level);
    record.updated_at = Utc::now();
    record.privilege
}

/// Revokes `level` on the association record in place and returns the new
/// mask. Distinct from full revocation, which deletes the record.
pub fn revoke_on(record: &mut SiteUserPrivilege, level: SitePrivilege) -> u32 {
    record.privilege = revoke(record.privilege, level);
    record.updated_at = Utc::now();
    record.privilege
}

/// Resolves the actor's association mask for `site_id` and tests `level`
/// against it.
pub async fn has_site_privileges(
    store: &dyn SitePrivilegeStore,
    user_id: Uuid,
    site_id: Uuid,
    level: SitePrivilege,
) -> AuthzResult<bool> {
    let mask = store.privilege_mask(user_id, site_id).await?;
    Ok(has_privilege(mask, level))
}

/// Lookup seam over the persisted `(user, site)` association masks. The
/// persistence layer behind it owns the transactional guarantees.
#[async_trait]
pub trait SitePrivilegeStore: Send + Sync {
    /// `None` when no association record exists for the pair.
    async fn privilege_mask(&self, user_id: Uuid, site_id: Uuid) -> AuthzResult<Option<u32>>;
}

/// In-memory store, used by the test suites and as a reference implementation
/// of the grant/revoke lifecycle.
#[derive(Debug, Default)]
pub struct MemorySitePrivilegeStore {
    records: RwLock<HashMap<(Uuid, Uuid), SiteUserPrivilege>>,
}

impl MemorySitePrivilegeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `level`, creating the association record if the pair has none.
    pub fn grant(&self, user_id: Uuid, site_id: Uuid, level: SitePrivilege) -> u32 {
        let mut records = self.records.write().expect("privilege store poisoned");
        let record = records
            .entry((user_id, site_id))
            .or_insert_with(|| SiteUserPrivilege::new(user_id, site_id));
        grant_on(record, level)
    }

    /// Clears `level`'s bit; the record survives with a reduced mask.
    /// Returns the new mask, or `None` if the pair has no record.
    pub fn revoke(&self, user_id: Uuid, site_id: Uuid, level: SitePrivilege) -> Option<u32> {
        let mut records = self.records.write().expect("privilege store poisoned");
        records
            .get_mut(&(user_id, site_id))
            .map(|record| revoke_on(record, level))
    }

    /// Full revocation: deletes the association record.
    pub fn remove(&self, user_id: Uuid, site_id: Uuid) -> bool {
        let mut records = self.records.write().expect("privilege store poisoned");
        records.remove(&(user_id, site_id)).is_some()
    }
}

#[async_trait]
impl SitePrivilegeStore for MemorySitePrivilegeStore {
    async fn privilege_mask(&self, user_id: Uuid, site_id: Uuid) -> AuthzResult<Option<u32>> {
        let records = self.records.read().expect("privilege store poisoned");
        Ok(records.get(&(user_id, site_id)).map(|record| record.privilege))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [SitePrivilege; 2] = [SitePrivilege::Editor, SitePrivilege::Admin];

    #[test]
    fn no_association_denies_every_level() {
        assert!(!has_privilege(None, SitePrivilege::User));
        for level in LEVELS {
            assert!(!has_privilege(None, level));
        }
    }

    #[test]
    fn any_association_satisfies_user_level() {
        assert!(has_privilege(Some(0), SitePrivilege::User));
        assert!(has_privilege(Some(SitePrivilege::Admin.bit()), SitePrivilege::User));
    }

    #[test]
    fn empty_mask_denies_elevated_levels() {
        for level in LEVELS {
            assert!(!has_privilege(Some(0), level));
        }
    }

    #[test]
    fn grant_makes_the_level_held() {
        for level in LEVELS {
            assert!(has_privilege(Some(grant(0, level)), level));
        }
    }

    #[test]
    fn revoke_makes_the_level_unheld() {
        let all = grant(grant(0, SitePrivilege::Editor), SitePrivilege::Admin);
        for level in LEVELS {
            assert!(!has_privilege(Some(revoke(all, level)), level));
        }
    }

    #[test]
    fn grant_then_revoke_round_trips() {
        let mask = SitePrivilege::Admin.bit();
        for level in [SitePrivilege::Editor] {
            assert_eq!(revoke(grant(mask, level), level), mask);
        }
    }

    #[test]
    fn grant_and_revoke_are_idempotent() {
        let mask = grant(0, SitePrivilege::Editor);
        assert_eq!(grant(mask, SitePrivilege::Editor), mask);

        let mask = revoke(mask, SitePrivilege::Editor);
        assert_eq!(revoke(mask, SitePrivilege::Editor), mask);
    }

    #[test]
    fn granting_admin_does_not_imply_editor() {
        let mask = grant(0, SitePrivilege::Admin);
        assert!(!has_privilege(Some(mask), SitePrivilege::Editor));
    }

    #[test]
    fn record_variants_mutate_in_place_and_return_the_mask() {
        let mut record = SiteUserPrivilege::new(Uuid::new_v4(), Uuid::new_v4());

        let mask = grant_on(&mut record, SitePrivilege::Editor);
        assert_eq!(mask, record.privilege);
        assert!(has_privilege(Some(record.privilege), SitePrivilege::Editor));

        let mask = revoke_on(&mut record, SitePrivilege::Editor);
        assert_eq!(mask, 0);
        assert_eq!(record.privilege, 0);
    }

    #[tokio::test]
    async fn site_privilege_lookup_delegates_to_the_mask_test() {
        let store = MemorySitePrivilegeStore::new();
        let (user, site) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(!has_site_privileges(&store, user, site, SitePrivilege::User)
            .await
            .unwrap());

        store.grant(user, site, SitePrivilege::User);
        assert!(has_site_privileges(&store, user, site, SitePrivilege::User)
            .await
            .unwrap());
        assert!(!has_site_privileges(&store, user, site, SitePrivilege::Editor)
            .await
            .unwrap());
    }
}
