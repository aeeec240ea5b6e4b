use crate::authz::principal::Principal;
use crate::config::RolesConfig;

/// Validates role strings against the configured role sets and answers the
/// "does this actor hold any specialist role" question.
///
/// The provider is built once from an immutable [`RolesConfig`] and never
/// mutated; the ordered views expose configuration order.
#[derive(Debug, Clone)]
pub struct RoleProvider {
    base: Vec<String>,
    specialist: Vec<String>,
    valid: Vec<String>,
}

impl RoleProvider {
    pub fn new(config: RolesConfig) -> Self {
        let valid = config
            .base
            .iter()
            .chain(config.specialist.iter())
            .cloned()
            .collect();
        Self {
            base: config.base,
            specialist: config.specialist,
            valid,
        }
    }

    /// Membership test against the union of base and specialist roles.
    pub fn is_valid_role(&self, role: &str) -> bool {
        self.valid.iter().any(|known| known == role)
    }

    /// True iff the actor's role set intersects the specialist set.
    /// Anonymous actors hold no roles.
    pub fn has_specialist_role(&self, principal: Option<&Principal>) -> bool {
        let Some(principal) = principal else {
            return false;
        };
        self.specialist.iter().any(|role| principal.has_role(role))
    }

    pub fn valid_roles(&self) -> &[String] {
        &self.valid
    }

    pub fn base_roles(&self) -> &[String] {
        &self.base
    }

    pub fn specialist_roles(&self) -> &[String] {
        &self.specialist
    }
}

impl Default for RoleProvider {
    fn default() -> Self {
        Self::new(RolesConfig::default())
    }
}
