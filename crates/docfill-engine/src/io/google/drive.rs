//! Google Drive calls used around a run: copy the template, share the result.

use serde::{Deserialize, Serialize};

use crate::editing::DocumentId;
use crate::io::google::{check_status, http_client};
use crate::io::{AccessToken, DocumentFiles, Role, StoreError};

pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

#[derive(Debug, Clone)]
pub struct GoogleDrive {
    http: reqwest::blocking::Client,
    token: AccessToken,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CopyRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CopyResponse {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    role: &'static str,
    email_address: &'a str,
}

impl GoogleDrive {
    pub fn new(token: AccessToken) -> Result<Self, StoreError> {
        Self::with_base_url(token, DEFAULT_DRIVE_BASE_URL)
    }

    pub fn with_base_url(token: AccessToken, base_url: impl Into<String>) -> Result<Self, StoreError> {
        Ok(Self {
            http: http_client()?,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl DocumentFiles for GoogleDrive {
    fn copy(&self, template: &DocumentId, title: &str) -> Result<DocumentId, StoreError> {
        let url = format!("{}/files/{}/copy", self.base_url, template);
        log::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .query(&[("supportsAllDrives", "true")])
            .bearer_auth(self.token.secret())
            .json(&CopyRequest { name: title })
            .send()?;
        let copied: CopyResponse = serde_json::from_str(&check_status(response)?.text()?)?;
        Ok(DocumentId(copied.id))
    }

    fn share(&self, document: &DocumentId, principal: &str, role: Role) -> Result<(), StoreError> {
        let url = format!("{}/files/{}/permissions", self.base_url, document);
        log::debug!("POST {url} ({} as {})", principal, role.as_str());
        let response = self
            .http
            .post(&url)
            .query(&[("supportsAllDrives", "true")])
            .bearer_auth(self.token.secret())
            .json(&PermissionRequest {
                kind: "user",
                role: role.as_str(),
                email_address: principal,
            })
            .send()?;
        check_status(response)?;
        Ok(())
    }

    fn location(&self, document: &DocumentId) -> String {
        format!("https://docs.google.com/document/d/{document}/edit")
    }
}
