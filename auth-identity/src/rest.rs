//! REST identity provider
//!
//! Resolves group membership with `GET {base_url}/users/{username}/groups`.
//! The response body is either a JSON array of groups or an object with a
//! `groups` array. The username always occupies exactly one path segment;
//! empty, `.` and `..` usernames are reported as unknown users.

use crate::{
    config::IdentityConfig,
    error::IdentityError,
    models::Group,
    provider::IdentityProvider,
};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupsResponse {
    List(Vec<Group>),
    Wrapped { groups: Vec<Group> },
}

impl GroupsResponse {
    fn into_groups(self) -> Vec<Group> {
        match self {
            GroupsResponse::List(groups) | GroupsResponse::Wrapped { groups } => groups,
        }
    }
}

pub struct RestIdentityProvider {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl RestIdentityProvider {
    /// Build a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ConfigError`] for an unusable base URL or
    /// HTTP client settings.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| IdentityError::ConfigError(format!("Invalid base URL {}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(IdentityError::ConfigError(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IdentityError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn groups_url(&self, username: &str) -> Result<Url, IdentityError> {
        // dot segments are collapsed by the URL parser and would address another endpoint
        if matches!(username, "" | "." | "..") {
            return Err(IdentityError::UserNotFound(username.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::ConfigError(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["users", username, "groups"]);
        Ok(url)
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn users_groups(&self, username: &str) -> Result<Vec<Group>, IdentityError> {
        let url = self.groups_url(username)?;
        debug!("Fetching groups for user {} from {}", username, url);

        let mut request = self.client.get(url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(IdentityError::UserNotFound(username.to_string()));
        }

        if !status.is_success() {
            warn!("Identity provider returned {} for user {}", status, username);
            return Err(IdentityError::Unavailable(format!(
                "unexpected status {} resolving groups",
                status
            )));
        }

        let groups = response.json::<GroupsResponse>().await?.into_groups();
        debug!("Identity provider returned {} groups for user {}", groups.len(), username);
        Ok(groups)
    }
}
