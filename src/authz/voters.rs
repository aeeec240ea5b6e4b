//! Collection-level authorization voting.
//!
//! A single voter holds a data-driven policy table keyed by resource type.
//! Each policy carries one rule for the sub-collection case (scoped under a
//! resolved parent) and one for the whole-collection case. Resource types
//! without a registered policy fail closed.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::authz::principal::Principal;
use crate::authz::privileges::{has_site_privileges, SitePrivilegeStore};
use crate::authz::resolver::ParentResolver;
use crate::authz::role_names;
use crate::authz::roles::RoleProvider;
use crate::config::AuthzMode;
use crate::errors::{AuthzError, AuthzResult};
use crate::models::privilege::SitePrivilege;
use crate::models::resource::{ParentRef, ResourceType};

/// Rule applied when the collection is scoped under a parent entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubCollectionRule {
    /// Never auto-approved through this path; finer checks happen at item
    /// level.
    Deny,
    /// Actor must hold at least this privilege level on the parent's owning
    /// site.
    SitePrivilege(SitePrivilege),
    /// Actor must hold the role and the privilege level on the parent's
    /// owning site.
    RoleAndSitePrivilege {
        role: String,
        level: SitePrivilege,
    },
    /// Actor must hold the role and be the parent's original creator.
    ParentCreatorWithRole { role: String },
}

/// Rule applied when the collection is unscoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WholeCollectionRule {
    Deny,
    /// Any configured specialist role grants access.
    AnySpecialist,
    Role(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPolicy {
    pub sub: SubCollectionRule,
    pub whole: WholeCollectionRule,
}

/// Parent relation as it arrives from the route layer: the linked type plus
/// the raw identifier segment, not yet parsed.
#[derive(Debug, Clone)]
pub struct ParentLink {
    pub resource_type: ResourceType,
    pub raw_id: String,
}

/// One collection-authorization question: which resource type, and whether
/// the operation is scoped under a parent.
#[derive(Debug, Clone)]
pub struct CollectionContext {
    pub resource_type: ResourceType,
    pub parent: Option<ParentLink>,
}

impl CollectionContext {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            parent: None,
        }
    }

    pub fn with_parent(mut self, resource_type: ResourceType, raw_id: impl Into<String>) -> Self {
        self.parent = Some(ParentLink {
            resource_type,
            raw_id: raw_id.into(),
        });
        self
    }
}

/// The voting engine: policy table plus the shared collaborators every rule
/// may consult. Decisions are pure predicates over state loaded for the
/// request; identical inputs always produce identical answers.
pub struct CollectionVoter {
    policies: HashMap<ResourceType, CollectionPolicy>,
    roles: RoleProvider,
    privileges: Arc<dyn SitePrivilegeStore>,
    resolver: Arc<dyn ParentResolver>,
}

impl CollectionVoter {
    pub fn new(
        roles: RoleProvider,
        privileges: Arc<dyn SitePrivilegeStore>,
        resolver: Arc<dyn ParentResolver>,
    ) -> Self {
        Self {
            policies: HashMap::new(),
            roles,
            privileges,
            resolver,
        }
    }

    /// Registers or replaces the policy for a resource type.
    pub fn register(&mut self, resource_type: ResourceType, policy: CollectionPolicy) {
        self.policies.insert(resource_type, policy);
    }

    pub fn with_policy(mut self, resource_type: ResourceType, policy: CollectionPolicy) -> Self {
        self.register(resource_type, policy);
        self
    }

    /// The catalog's standard policy table.
    pub fn with_catalog_policies(self) -> Self {
        self.with_policy(
            ResourceType::Site,
            CollectionPolicy {
                sub: SubCollectionRule::Deny,
                whole: WholeCollectionRule::AnySpecialist,
            },
        )
        .with_policy(
            ResourceType::Area,
            CollectionPolicy {
                sub: SubCollectionRule::ParentCreatorWithRole {
                    role: role_names::EDITOR.to_string(),
                },
                whole: WholeCollectionRule::Deny,
            },
        )
        .with_policy(
            ResourceType::Context,
            CollectionPolicy {
                sub: SubCollectionRule::SitePrivilege(SitePrivilege::User),
                whole: WholeCollectionRule::Deny,
            },
        )
        .with_policy(
            ResourceType::StratigraphicUnit,
            CollectionPolicy {
                sub: SubCollectionRule::SitePrivilege(SitePrivilege::User),
                whole: WholeCollectionRule::Deny,
            },
        )
        .with_policy(
            ResourceType::Pottery,
            CollectionPolicy {
                sub: SubCollectionRule::RoleAndSitePrivilege {
                    role: role_names::CERAMIC_SPECIALIST.to_string(),
                    level: SitePrivilege::User,
                },
                whole: WholeCollectionRule::Role(role_names::CERAMIC_SPECIALIST.to_string()),
            },
        )
        .with_policy(
            ResourceType::Sample,
            CollectionPolicy {
                sub: SubCollectionRule::RoleAndSitePrivilege {
                    role: role_names::ARCHAEO_BOTANIST.to_string(),
                    level: SitePrivilege::User,
                },
                whole: WholeCollectionRule::Role(role_names::ARCHAEO_BOTANIST.to_string()),
            },
        )
        .with_policy(
            ResourceType::MediaObject,
            CollectionPolicy {
                sub: SubCollectionRule::Deny,
                whole: WholeCollectionRule::AnySpecialist,
            },
        )
        .with_policy(
            ResourceType::User,
            CollectionPolicy {
                sub: SubCollectionRule::Deny,
                whole: WholeCollectionRule::Deny,
            },
        )
        .with_policy(
            ResourceType::SiteUserPrivilege,
            CollectionPolicy {
                sub: SubCollectionRule::Deny,
                whole: WholeCollectionRule::Deny,
            },
        )
    }

    /// Single-shot decision for one collection request. Unregistered types
    /// are an error (fail closed); an unresolvable parent degrades to the
    /// whole-collection path.
    pub async fn vote(
        &self,
        ctx: &CollectionContext,
        principal: Option<&Principal>,
    ) -> AuthzResult<bool> {
        match self.resolve_parent(ctx).await {
            Some(parent) => {
                self.vote_on_sub_collection(ctx.resource_type, &parent, principal)
                    .await
            }
            None => self.vote_on_whole_collection(ctx.resource_type, principal),
        }
    }

    /// Applies the enforcement mode on top of [`vote`](Self::vote). `Off`
    /// skips evaluation entirely; `Advisory` logs denials but allows.
    /// Unregistered resource types stay an error in every evaluating mode.
    pub async fn decide(
        &self,
        ctx: &CollectionContext,
        principal: Option<&Principal>,
        mode: AuthzMode,
    ) -> AuthzResult<bool> {
        if mode == AuthzMode::Off {
            return Ok(true);
        }
        let allowed = self.vote(ctx, principal).await?;
        if !allowed && mode == AuthzMode::Advisory {
            tracing::warn!(
                resource_type = %ctx.resource_type,
                user = %actor_label(principal),
                "collection access denied (advisory mode, allowing)"
            );
            return Ok(true);
        }
        Ok(allowed)
    }

    /// May the actor list/create under this resolved parent?
    pub async fn vote_on_sub_collection(
        &self,
        resource_type: ResourceType,
        parent: &ParentRef,
        principal: Option<&Principal>,
    ) -> AuthzResult<bool> {
        let policy = self.policy_for(resource_type)?;
        let allowed = match &policy.sub {
            SubCollectionRule::Deny => false,
            SubCollectionRule::SitePrivilege(level) => {
                self.holds_site_privilege(principal, parent.site_id, *level)
                    .await?
            }
            SubCollectionRule::RoleAndSitePrivilege { role, level } => {
                holds_role(principal, role)
                    && self
                        .holds_site_privilege(principal, parent.site_id, *level)
                        .await?
            }
            SubCollectionRule::ParentCreatorWithRole { role } => {
                holds_role(principal, role)
                    && principal.map(|p| p.user_id == parent.created_by).unwrap_or(false)
            }
        };

        tracing::debug!(
            resource_type = %resource_type,
            parent_type = %parent.resource_type,
            parent_id = %parent.id,
            user = %actor_label(principal),
            allowed,
            "sub-collection vote"
        );
        Ok(allowed)
    }

    /// May the actor list/create on the unscoped collection?
    pub fn vote_on_whole_collection(
        &self,
        resource_type: ResourceType,
        principal: Option<&Principal>,
    ) -> AuthzResult<bool> {
        let policy = self.policy_for(resource_type)?;
        let allowed = match &policy.whole {
            WholeCollectionRule::Deny => false,
            WholeCollectionRule::AnySpecialist => self.roles.has_specialist_role(principal),
            WholeCollectionRule::Role(role) => holds_role(principal, role),
        };

        tracing::debug!(
            resource_type = %resource_type,
            user = %actor_label(principal),
            allowed,
            "whole-collection vote"
        );
        Ok(allowed)
    }

    fn policy_for(&self, resource_type: ResourceType) -> AuthzResult<&CollectionPolicy> {
        self.policies
            .get(&resource_type)
            .ok_or(AuthzError::UnregisteredVoter(resource_type))
    }

    async fn holds_site_privilege(
        &self,
        principal: Option<&Principal>,
        site_id: Uuid,
        level: SitePrivilege,
    ) -> AuthzResult<bool> {
        let Some(principal) = principal else {
            return Ok(false);
        };
        has_site_privileges(self.privileges.as_ref(), principal.user_id, site_id, level).await
    }

    /// Parses and resolves the declared parent. Any failure degrades to the
    /// whole-collection path; only a missing policy may fail the request.
    async fn resolve_parent(&self, ctx: &CollectionContext) -> Option<ParentRef> {
        let link = ctx.parent.as_ref()?;
        let id = match Uuid::parse_str(&link.raw_id) {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!(
                    parent_type = %link.resource_type,
                    raw_id = %link.raw_id,
                    "malformed parent id, falling back to whole-collection vote"
                );
                return None;
            }
        };
        match self.resolver.resolve(link.resource_type, id).await {
            Ok(parent) => parent,
            Err(err) => {
                tracing::debug!(
                    parent_type = %link.resource_type,
                    parent_id = %id,
                    error = %err,
                    "parent resolution failed, falling back to whole-collection vote"
                );
                None
            }
        }
    }
}

fn holds_role(principal: Option<&Principal>, role: &str) -> bool {
    principal.map(|p| p.has_role(role)).unwrap_or(false)
}

fn actor_label(principal: Option<&Principal>) -> String {
    principal
        .map(|p| p.user_id.to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::privileges::MemorySitePrivilegeStore;
    use crate::authz::resolver::MemoryResolver;

    fn voter() -> (
        CollectionVoter,
        Arc<MemorySitePrivilegeStore>,
        Arc<MemoryResolver>,
    ) {
        let store = Arc::new(MemorySitePrivilegeStore::new());
        let resolver = Arc::new(MemoryResolver::new());
        let voter = CollectionVoter::new(
            RoleProvider::default(),
            store.clone(),
            resolver.clone(),
        )
        .with_catalog_policies();
        (voter, store, resolver)
    }

    fn site_parent(site_id: Uuid, created_by: Uuid) -> ParentRef {
        ParentRef::new(ResourceType::Site, site_id, site_id, created_by)
    }

    #[tokio::test]
    async fn site_privilege_rule_requires_membership_on_the_owning_site() {
        let (voter, store, _) = voter();
        let site_id = Uuid::new_v4();
        let member = Principal::new(Uuid::new_v4());
        let parent = site_parent(site_id, Uuid::new_v4());

        assert!(!voter
            .vote_on_sub_collection(ResourceType::Context, &parent, Some(&member))
            .await
            .unwrap());

        store.grant(member.user_id, site_id, SitePrivilege::User);
        assert!(voter
            .vote_on_sub_collection(ResourceType::Context, &parent, Some(&member))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn role_and_privilege_rule_is_a_conjunction() {
        let (voter, store, _) = voter();
        let site_id = Uuid::new_v4();
        let parent = ParentRef::new(
            ResourceType::StratigraphicUnit,
            Uuid::new_v4(),
            site_id,
            Uuid::new_v4(),
        );
        let ceramicist = Principal::new(Uuid::new_v4())
            .with_roles(vec![role_names::CERAMIC_SPECIALIST.to_string()]);

        // role without site privilege
        assert!(!voter
            .vote_on_sub_collection(ResourceType::Pottery, &parent, Some(&ceramicist))
            .await
            .unwrap());

        // privilege without role
        let member = Principal::new(Uuid::new_v4());
        store.grant(member.user_id, site_id, SitePrivilege::User);
        assert!(!voter
            .vote_on_sub_collection(ResourceType::Pottery, &parent, Some(&member))
            .await
            .unwrap());

        // both
        store.grant(ceramicist.user_id, site_id, SitePrivilege::User);
        assert!(voter
            .vote_on_sub_collection(ResourceType::Pottery, &parent, Some(&ceramicist))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn creator_rule_checks_identity_and_role() {
        let (voter, _, _) = voter();
        let creator = Principal::new(Uuid::new_v4())
            .with_roles(vec![role_names::EDITOR.to_string()]);
        let parent = site_parent(Uuid::new_v4(), creator.user_id);

        assert!(voter
            .vote_on_sub_collection(ResourceType::Area, &parent, Some(&creator))
            .await
            .unwrap());

        let other_editor = Principal::new(Uuid::new_v4())
            .with_roles(vec![role_names::EDITOR.to_string()]);
        assert!(!voter
            .vote_on_sub_collection(ResourceType::Area, &parent, Some(&other_editor))
            .await
            .unwrap());

        let creator_without_role = Principal::new(creator.user_id);
        assert!(!voter
            .vote_on_sub_collection(ResourceType::Area, &parent, Some(&creator_without_role))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn whole_collection_rules() {
        let (voter, _, _) = voter();
        let specialist = Principal::new(Uuid::new_v4())
            .with_roles(vec![role_names::HISTORIAN.to_string()]);
        let editor =
            Principal::new(Uuid::new_v4()).with_roles(vec![role_names::EDITOR.to_string()]);

        assert!(voter
            .vote_on_whole_collection(ResourceType::Site, Some(&specialist))
            .unwrap());
        assert!(!voter
            .vote_on_whole_collection(ResourceType::Site, Some(&editor))
            .unwrap());
        assert!(!voter
            .vote_on_whole_collection(ResourceType::User, Some(&specialist))
            .unwrap());
        assert!(!voter
            .vote_on_whole_collection(ResourceType::Site, None)
            .unwrap());
    }

    #[tokio::test]
    async fn unregistered_resource_type_fails_closed() {
        let store = Arc::new(MemorySitePrivilegeStore::new());
        let resolver = Arc::new(MemoryResolver::new());
        let voter = CollectionVoter::new(RoleProvider::default(), store, resolver);

        let err = voter
            .vote(&CollectionContext::new(ResourceType::Pottery), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::UnregisteredVoter(ResourceType::Pottery)));
    }

    #[tokio::test]
    async fn malformed_parent_id_degrades_to_whole_collection() {
        let (voter, store, _) = voter();
        let member = Principal::new(Uuid::new_v4());
        store.grant(member.user_id, Uuid::new_v4(), SitePrivilege::User);

        let ctx = CollectionContext::new(ResourceType::Context)
            .with_parent(ResourceType::Site, "not-a-uuid");

        // Context's whole-collection rule is Deny, so the fallback denies.
        assert!(!voter.vote(&ctx, Some(&member)).await.unwrap());
    }

    #[tokio::test]
    async fn enforcement_modes() {
        let (voter, _, _) = voter();
        let ctx = CollectionContext::new(ResourceType::User);

        assert!(!voter
            .decide(&ctx, None, AuthzMode::Strict)
            .await
            .unwrap());
        assert!(voter
            .decide(&ctx, None, AuthzMode::Advisory)
            .await
            .unwrap());
        assert!(voter.decide(&ctx, None, AuthzMode::Off).await.unwrap());
    }
}
