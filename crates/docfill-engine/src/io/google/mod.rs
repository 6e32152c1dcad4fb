pub mod docs;
pub mod drive;

pub use docs::{DEFAULT_DOCS_BASE_URL, GoogleDocsStore};
pub use drive::{DEFAULT_DRIVE_BASE_URL, GoogleDrive};

use crate::io::StoreError;

fn http_client() -> Result<reqwest::blocking::Client, StoreError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()?)
}

/// Turn a non-success response into `StoreError::Status` carrying the body
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}
