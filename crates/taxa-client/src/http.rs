//! JSON-over-HTTP taxonomy service

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::service::TaxonomyService;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use taxa_core::{NewTaxon, NodeId, TaxonomicNode, TaxonomicRank};

/// Longest error body kept in [`ServiceError::Status`]
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

/// REST client for the taxonomy endpoints
#[derive(Debug, Clone)]
pub struct HttpTaxonomyService {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpTaxonomyService {
    /// Build a client from configuration
    ///
    /// # Errors
    /// - `ServiceError::Config` if the configuration is invalid, the base URL
    ///   does not parse, or the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let raw = config.base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(raw)
            .map_err(|e| ServiceError::Config(format!("invalid base_url {raw}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Config(format!("base_url cannot carry a path: {raw}")));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Service root this client talks to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Endpoint below the base URL, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::Config(format!("base_url cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, id: Option<&NodeId>) -> Result<Response, ServiceError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ServiceError::NotFound(id.clone()));
            }
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        tracing::warn!(status = status.as_u16(), "taxonomy request failed");
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder, id: Option<&NodeId>) -> Result<T, ServiceError> {
        let response = self.send(request, id).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TaxonomyService for HttpTaxonomyService {
    async fn list_by_rank(&self, rank: TaxonomicRank) -> Result<Vec<TaxonomicNode>, ServiceError> {
        tracing::debug!(rank = %rank, "GET taxonomy by rank");
        let request = self
            .client
            .get(self.url(&["taxonomy"])?)
            .query(&[("rank", rank.as_str())]);
        self.json(request, None).await
    }

    async fn list_by_parent(&self, parent_id: &NodeId) -> Result<Vec<TaxonomicNode>, ServiceError> {
        tracing::debug!(parent = %parent_id, "GET taxonomy children");
        let request = self
            .client
            .get(self.url(&["taxonomy", parent_id.as_str(), "children"])?);
        self.json(request, Some(parent_id)).await
    }

    async fn get(&self, id: &NodeId) -> Result<TaxonomicNode, ServiceError> {
        let request = self.client.get(self.url(&["taxonomy", id.as_str()])?);
        self.json(request, Some(id)).await
    }

    async fn create(&self, request: NewTaxon) -> Result<TaxonomicNode, ServiceError> {
        tracing::info!(rank = %request.rank, name = %request.name, "POST taxonomy");
        let builder = self.client.post(self.url(&["taxonomy"])?).json(&request);
        self.json(builder, request.parent_id.as_ref()).await
    }

    async fn rename(&self, id: &NodeId, name: &str) -> Result<TaxonomicNode, ServiceError> {
        tracing::info!(node = %id, name, "PATCH taxonomy");
        let request = self
            .client
            .patch(self.url(&["taxonomy", id.as_str()])?)
            .json(&RenameBody { name });
        self.json(request, Some(id)).await
    }

    async fn delete(&self, id: &NodeId) -> Result<(), ServiceError> {
        tracing::info!(node = %id, "DELETE taxonomy");
        let request = self.client.delete(self.url(&["taxonomy", id.as_str()])?);
        self.send(request, Some(id)).await?;
        Ok(())
    }
}
