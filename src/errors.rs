use crate::models::resource::ResourceType;

pub type AuthzResult<T> = Result<T, AuthzError>;

#[derive(thiserror::Error, Debug)]
pub enum AuthzError {
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
    #[error("no collection voter registered for resource type '{0}'")]
    UnregisteredVoter(ResourceType),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("privilege store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthzError {
    pub fn unknown_resource(name: impl Into<String>) -> Self {
        Self::UnknownResource(name.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<anyhow::Error> for AuthzError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}
