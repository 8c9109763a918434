//! # Resource API Client
//!
//! The bridge talks to the resource API only through [`ResourceApi`].
//! [`HttpResourceApi`] is the production implementation; tests substitute
//! in-process fakes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::pictures::PictureUrl;
use crate::rest_api::DeletedResponse;
use crate::store::{Brewery, BreweryDetails};

use super::errors::{BridgeError, BridgeResult};

/// Connect timeout for resource API calls. Requests themselves have none.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upstream calls the bridge depends on
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET /breweries`
    async fn list_breweries(&self) -> BridgeResult<Vec<Brewery>>;

    /// `GET /breweries/:id`; `Ok(None)` when the brewery does not exist
    async fn get_brewery(&self, id: u64) -> BridgeResult<Option<BreweryDetails>>;

    /// `DELETE /breweries/:id`, returning the deleted id
    async fn delete_brewery(&self, id: u64) -> BridgeResult<u64>;

    /// `GET /pictures/:id`, returning the resolved display URL
    async fn picture_url(&self, picture_id: u64) -> BridgeResult<Option<String>>;
}

/// [`ResourceApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpResourceApi {
    client: Client,
    base_url: String,
}

impl HttpResourceApi {
    pub fn new(base_url: impl Into<String>) -> BridgeResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| BridgeError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success answer into [`BridgeError::Upstream`], preferring
/// the `error` field of a JSON body for the message.
async fn ensure_success(response: Response) -> BridgeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        });

    Err(BridgeError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ResourceApi for HttpResourceApi {
    async fn list_breweries(&self) -> BridgeResult<Vec<Brewery>> {
        let response = self.client.get(self.url("/breweries")).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn get_brewery(&self, id: u64) -> BridgeResult<Option<BreweryDetails>> {
        let response = self
            .client
            .get(self.url(&format!("/breweries/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(ensure_success(response).await?.json().await?))
    }

    async fn delete_brewery(&self, id: u64) -> BridgeResult<u64> {
        let response = self
            .client
            .delete(self.url(&format!("/breweries/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BridgeError::NotFound(id));
        }
        let deleted: DeletedResponse = ensure_success(response).await?.json().await?;
        Ok(deleted.id)
    }

    async fn picture_url(&self, picture_id: u64) -> BridgeResult<Option<String>> {
        let response = self
            .client
            .get(self.url(&format!("/pictures/{}", picture_id)))
            .send()
            .await?;

        let picture: PictureUrl = ensure_success(response).await?.json().await?;
        Ok(picture.data)
    }
}
