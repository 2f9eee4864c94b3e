//! Launch parameters and endpoints derived from the page URL.

use pagemark_core::EditorProfile;
use thiserror::Error;
use url::{Url, form_urlencoded};

/// Why the editor cannot start from the page URL.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unknown editor mode: {0}")]
    UnknownProfile(String),
    #[error("No document to open")]
    MissingDocument,
    #[error("Save endpoint must be http or https, got {0}")]
    UnsupportedScheme(String),
}

/// What the host page asked the editor to open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Backend identifier of the document (`doc=`).
    pub document_id: Option<String>,
    /// Editor flavor (`mode=markup` or `mode=signature`).
    pub profile: Option<EditorProfile>,
}

impl LaunchParams {
    /// Read `doc` and `mode` from the query string, then the hash.
    pub fn from_url(href: &str) -> Result<Self, LaunchError> {
        let url = Url::parse(href)?;
        let mut params = parse_launch_params(url.query().unwrap_or_default())?;
        let from_hash = parse_launch_params(url.fragment().unwrap_or_default())?;
        if from_hash.document_id.is_some() {
            params.document_id = from_hash.document_id;
        }
        if from_hash.profile.is_some() {
            params.profile = from_hash.profile;
        }
        Ok(params)
    }

    pub fn document_id(&self) -> Result<&str, LaunchError> {
        self.document_id.as_deref().ok_or(LaunchError::MissingDocument)
    }

    /// Markup unless the URL asked for something else.
    pub fn profile(&self) -> EditorProfile {
        self.profile.unwrap_or_default()
    }
}

/// Parse launch parameters from a form-encoded query string or hash.
/// Supports formats like `?doc=contract.pdf&mode=signature`.
pub fn parse_launch_params(s: &str) -> Result<LaunchParams, LaunchError> {
    let s = s.trim_start_matches(['?', '#']);
    let mut params = LaunchParams::default();

    for (key, value) in form_urlencoded::parse(s.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "doc" => params.document_id = Some(value.into_owned()),
            "mode" => params.profile = Some(parse_profile(&value)?),
            _ => {}
        }
    }

    Ok(params)
}

pub fn parse_profile(mode: &str) -> Result<EditorProfile, LaunchError> {
    mode.parse().map_err(|_| LaunchError::UnknownProfile(mode.to_string()))
}

/// Resolve the configured save endpoint against the page URL.
///
/// The result must be http(s) so the fetch client can post to it.
pub fn resolve_endpoint(page_url: &str, endpoint: &str) -> Result<Url, LaunchError> {
    let url = Url::parse(page_url)?.join(endpoint)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LaunchError::UnsupportedScheme(other.to_string())),
    }
}
