use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the token file in local mode
pub const TOKEN_ENV_VAR: &str = "DOCFILL_ACCESS_TOKEN";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no access token: set {TOKEN_ENV_VAR} or configure token_path")]
    MissingToken,

    #[error("failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("token file {0} is empty")]
    EmptyToken(PathBuf),

    #[error("metadata server request failed: {0}")]
    Metadata(#[from] reqwest::Error),

    #[error("metadata server returned {0}")]
    MetadataStatus(u16),
}

/// Where credentials come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// A bearer token stored on disk or in the environment
    #[default]
    Local,
    /// Ambient credentials from the compute metadata server
    Cloud,
}

/// OAuth bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Acquire a bearer token for the given deployment mode
pub fn acquire_token(
    mode: DeploymentMode,
    token_path: Option<&Path>,
) -> Result<AccessToken, AuthError> {
    match mode {
        DeploymentMode::Local => local_token(std::env::var(TOKEN_ENV_VAR).ok(), token_path),
        DeploymentMode::Cloud => metadata_token(),
    }
}

fn local_token(from_env: Option<String>, token_path: Option<&Path>) -> Result<AccessToken, AuthError> {
    if let Some(token) = from_env.map(|t| t.trim().to_string())
        && !token.is_empty()
    {
        log::debug!("using access token from {TOKEN_ENV_VAR}");
        return Ok(AccessToken(token));
    }

    let path = token_path.ok_or(AuthError::MissingToken)?;
    let content = std::fs::read_to_string(path).map_err(|source| AuthError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let token = content.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken(path.to_path_buf()));
    }
    log::debug!("using access token from {}", path.display());
    Ok(AccessToken(token.to_string()))
}

fn metadata_token() -> Result<AccessToken, AuthError> {
    let response = reqwest::blocking::Client::new()
        .get(METADATA_TOKEN_URL)
        .header("Metadata-Flavor", "Google")
        .send()?;
    if !response.status().is_success() {
        return Err(AuthError::MetadataStatus(response.status().as_u16()));
    }
    let token: MetadataToken = response.json()?;
    log::debug!("using access token from metadata server");
    Ok(AccessToken(token.access_token))
}
