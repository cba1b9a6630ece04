use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid identity provider response: {0}")]
    InvalidResponse(String),

    #[error("Identity provider configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            IdentityError::InvalidResponse(err.to_string())
        } else {
            IdentityError::Unavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
