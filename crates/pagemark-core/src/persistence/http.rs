//! HTTP save backend.

use super::{
    BoxFuture, PersistenceBackend, PersistenceError, PersistenceResult, SaveRequest, SaveResponse,
};

/// Posts save requests as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    /// `endpoint` must be an absolute URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PersistenceBackend for HttpBackend {
    fn save<'a>(
        &'a self,
        request: &'a SaveRequest,
    ) -> BoxFuture<'a, PersistenceResult<SaveResponse>> {
        Box::pin(async move {
            log::debug!("POST {} ({} annotations)", self.endpoint, request.annotations.len());
            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(|e| PersistenceError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(PersistenceError::Rejected(format!("HTTP {}", status)));
            }

            let body = response
                .text()
                .await
                .map_err(|e| PersistenceError::Network(e.to_string()))?;
            Ok(serde_json::from_str(&body)?)
        })
    }
}
