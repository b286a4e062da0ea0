use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::error::{ApiError, ApiResult, FieldError};
use crate::api::repository::NetworkRepository;
use crate::api::types::{NetworkDetails, NetworkId, NetworkSummary, NewNetwork, Sample, Split};

#[derive(Deserialize)]
struct NetworkListBody {
    networks: Vec<NetworkSummary>,
}

#[derive(Serialize)]
struct PredictBody<'a> {
    input: &'a [f64],
}

#[derive(Deserialize)]
struct PredictOutput {
    output: Vec<f64>,
}

/// Repository backed by the REST API at `base_url`.
///
/// Requests go to `{base_url}/api/...`. No request timeout is configured;
/// a stalled backend stalls the caller.
#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    pub fn new(base_url: Url) -> ApiResult<Self> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(HttpRepository { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/api/{path}`, keeping any path prefix on the base URL.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn send(&self, label: &str, request: RequestBuilder) -> ApiResult<(StatusCode, String)> {
        let response = request.send().map_err(|e| {
            warn!("{label} failed: {e}");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let body = response.text()?;
        debug!("{label} -> {status}");
        Ok((status, body))
    }

    fn fetch_json<T: DeserializeOwned>(&self, label: &str, request: RequestBuilder) -> ApiResult<T> {
        let (status, body) = self.send(label, request)?;
        if !status.is_success() {
            return Err(rejection(label, status, body));
        }
        serde_json::from_str(&body).map_err(|e| {
            warn!("{label} returned malformed JSON: {e}");
            ApiError::Decode(e)
        })
    }

    fn expect_success(&self, label: &str, request: RequestBuilder) -> ApiResult<()> {
        let (status, body) = self.send(label, request)?;
        if !status.is_success() {
            return Err(rejection(label, status, body));
        }
        Ok(())
    }
}

/// Interprets a non-success response: a field-error body wins, then 404,
/// then a bare status.
fn rejection(label: &str, status: StatusCode, body: String) -> ApiError {
    if let Ok(field) = serde_json::from_str::<FieldError>(&body) {
        debug!("{label} rejected: {field}");
        return ApiError::Field(field);
    }
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound;
    }
    warn!("{label} -> {status}: {body}");
    ApiError::Status { status: status.as_u16(), body }
}

impl NetworkRepository for HttpRepository {
    fn list_networks(&self) -> ApiResult<Vec<NetworkSummary>> {
        let url = self.api_url("networks");
        let body: NetworkListBody = self.fetch_json("GET /api/networks", self.client.get(url))?;
        Ok(body.networks)
    }

    fn get_network(&self, id: NetworkId) -> ApiResult<NetworkDetails> {
        let url = self.api_url(&format!("networks/{id}"));
        self.fetch_json(&format!("GET /api/networks/{id}"), self.client.get(url))
    }

    fn create_network(&self, network: &NewNetwork) -> ApiResult<()> {
        let url = self.api_url("networks");
        self.expect_success("POST /api/networks", self.client.post(url).json(network))
    }

    fn delete_network(&self, id: NetworkId) -> ApiResult<()> {
        let url = self.api_url(&format!("networks/{id}"));
        self.expect_success(&format!("DELETE /api/networks/{id}"), self.client.delete(url))
    }

    fn predict(&self, id: NetworkId, input: &[f64]) -> ApiResult<Vec<f64>> {
        let url = self.api_url(&format!("networks/{id}/predict"));
        let request = self.client.post(url).json(&PredictBody { input });
        let body: PredictOutput = self.fetch_json(&format!("POST /api/networks/{id}/predict"), request)?;
        Ok(body.output)
    }

    fn get_sample(&self, split: Split, index: usize) -> ApiResult<Sample> {
        let url = self.api_url(&format!("data/{split}/{index}"));
        self.fetch_json(&format!("GET /api/data/{split}/{index}"), self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(base: &str) -> HttpRepository {
        HttpRepository::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn api_url_joins_without_double_slashes() {
        assert_eq!(repo("http://localhost:8080").api_url("networks"), "http://localhost:8080/api/networks");
        assert_eq!(
            repo("http://localhost:8080/nn/").api_url("networks/4/predict"),
            "http://localhost:8080/nn/api/networks/4/predict"
        );
    }

    #[test]
    fn rejection_prefers_field_error_body() {
        let err = rejection("t", StatusCode::BAD_REQUEST, r#"{"field":"name","error":"taken"}"#.into());
        assert_eq!(err.field_error(), Some(&FieldError::new("name", "taken")));
    }

    #[test]
    fn rejection_maps_plain_404_to_not_found() {
        let err = rejection("t", StatusCode::NOT_FOUND, "Network not found".into());
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn rejection_keeps_unparsed_status() {
        let err = rejection("t", StatusCode::INTERNAL_SERVER_ERROR, "Failed to add network".into());
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}
