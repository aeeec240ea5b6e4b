//! Process-wide authorization configuration.
//!
//! Loaded once at startup and handed to the role provider and voter by the
//! composition root; nothing in this crate reads the environment after
//! construction.

use serde::Deserialize;

use crate::errors::{AuthzError, AuthzResult};

const BASE_ROLES_ENV: &str = "STRATUM_BASE_ROLES";
const SPECIALIST_ROLES_ENV: &str = "STRATUM_SPECIALIST_ROLES";
const AUTHZ_MODE_ENV: &str = "STRATUM_AUTHZ_MODE";

const DEFAULT_BASE_ROLES: &[&str] = &["ROLE_USER", "ROLE_EDITOR", "ROLE_ADMIN"];
const DEFAULT_SPECIALIST_ROLES: &[&str] = &[
    "ROLE_CERAMIC_SPECIALIST",
    "ROLE_ZOO_ARCHAEOLOGIST",
    "ROLE_ARCHAEO_BOTANIST",
    "ROLE_HISTORIAN",
    "ROLE_GEO_ARCHAEOLOGIST",
    "ROLE_ANTHROPOLOGIST",
];

/// The two disjoint ordered role sets the role provider is built from.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    pub base: Vec<String>,
    pub specialist: Vec<String>,
}

impl RolesConfig {
    pub fn new(
        base: impl IntoIterator<Item = String>,
        specialist: impl IntoIterator<Item = String>,
    ) -> AuthzResult<Self> {
        let config = Self {
            base: base.into_iter().collect(),
            specialist: specialist.into_iter().collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads `STRATUM_BASE_ROLES` / `STRATUM_SPECIALIST_ROLES` (comma-separated),
    /// falling back to the catalog defaults.
    pub fn from_env() -> AuthzResult<Self> {
        let _ = dotenvy::dotenv();

        let base = std::env::var(BASE_ROLES_ENV)
            .map(|raw| split_roles(&raw))
            .unwrap_or_else(|_| to_owned(DEFAULT_BASE_ROLES));
        let specialist = std::env::var(SPECIALIST_ROLES_ENV)
            .map(|raw| split_roles(&raw))
            .unwrap_or_else(|_| to_owned(DEFAULT_SPECIALIST_ROLES));

        Self::new(base, specialist)
    }

    fn validate(&self) -> AuthzResult<()> {
        if self.base.is_empty() {
            return Err(AuthzError::configuration("base role set must not be empty"));
        }
        if let Some(role) = self
            .specialist
            .iter()
            .find(|role| self.base.iter().any(|base| base == *role))
        {
            return Err(AuthzError::configuration(format!(
                "role '{role}' appears in both the base and specialist sets"
            )));
        }
        Ok(())
    }
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            base: to_owned(DEFAULT_BASE_ROLES),
            specialist: to_owned(DEFAULT_SPECIALIST_ROLES),
        }
    }
}

fn split_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_owned(roles: &[&str]) -> Vec<String> {
    roles.iter().map(|role| role.to_string()).collect()
}

/// Authorization enforcement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthzMode {
    /// No permission checks (development mode)
    Off,
    /// Log denials but allow requests (testing mode)
    Advisory,
    /// Enforce denials (production mode)
    #[default]
    Strict,
}

impl AuthzMode {
    pub fn from_env() -> Self {
        std::env::var(AUTHZ_MODE_ENV)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "off" => AuthzMode::Off,
            "advisory" => AuthzMode::Advisory,
            _ => AuthzMode::Strict,
        }
    }
}
