use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AuthzResult;
use crate::models::resource::{ParentRef, ResourceType};
use crate::models::site::Site;

/// Resolves a `(type, id)` pair to a lazy parent reference. Implementations
/// must not load the entity's attribute state; voters only compare identity
/// and ownership.
#[async_trait]
pub trait ParentResolver: Send + Sync {
    /// `None` when no entity with that identity exists.
    async fn resolve(
        &self,
        resource_type: ResourceType,
        id: Uuid,
    ) -> AuthzResult<Option<ParentRef>>;
}

/// In-memory resolver used by the test suites.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    entries: RwLock<HashMap<(ResourceType, Uuid), ParentRef>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, parent: ParentRef) {
        let mut entries = self.entries.write().expect("resolver poisoned");
        entries.insert((parent.resource_type, parent.id), parent);
    }

    pub fn insert_site(&self, site: &Site) {
        self.insert(ParentRef::from(site));
    }
}

#[async_trait]
impl ParentResolver for MemoryResolver {
    async fn resolve(
        &self,
        resource_type: ResourceType,
        id: Uuid,
    ) -> AuthzResult<Option<ParentRef>> {
        let entries = self.entries.read().expect("resolver poisoned");
        Ok(entries.get(&(resource_type, id)).copied())
    }
}
