//! NFT metadata client
//!
//! Each loan card wants the image of its collateral NFT. `OpenSeaClient`
//! fetches it from an OpenSea-v2-shaped HTTP API, addressed by the loan's
//! own collection address and token identifier. Results are keyed per loan
//! in an `NftImageLookup`; a failed lookup becomes an error entry for that
//! loan and never disturbs the rest of the batch.

use async_trait::async_trait;
use ethers::types::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::LensConfig;
use crate::error::{LensError, LensResult};

//-----------------------------------------------------------------------------
// Image Lookup Types
//-----------------------------------------------------------------------------

/// Outcome of one per-loan metadata lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftImageEntry {
    /// Image URL when the lookup succeeded and the API had one
    pub image_url: Option<String>,

    /// Error message when the lookup failed
    pub error: Option<String>,
}

impl NftImageEntry {
    /// Entry for a successful lookup
    pub fn resolved(image_url: Option<String>) -> Self {
        Self {
            image_url,
            error: None,
        }
    }

    /// Entry for a failed lookup
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            image_url: None,
            error: Some(message.into()),
        }
    }
}

/// Image lookup keyed by loan id
pub type NftImageLookup = HashMap<String, NftImageEntry>;

//-----------------------------------------------------------------------------
// Response Envelope
//-----------------------------------------------------------------------------

/// Top-level response of the NFT endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NftEnvelope {
    pub nft: NftDetails,
}

/// Subset of the NFT object the board consumes
#[derive(Debug, Clone, Deserialize)]
pub struct NftDetails {
    #[serde(default)]
    pub identifier: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

//-----------------------------------------------------------------------------
// Metadata Client Trait
//-----------------------------------------------------------------------------

/// Defines the interface for fetching collateral NFT metadata.
#[async_trait]
pub trait NftMetadataClient: Send + Sync {
    /// Fetch the image URL for one token of one collection
    ///
    /// `Ok(None)` means the API answered but carries no image; errors are
    /// transport or decoding failures.
    async fn fetch_image_url(
        &self,
        collection: Address,
        identifier: &str,
    ) -> LensResult<Option<String>>;
}

//-----------------------------------------------------------------------------
// OpenSea Client
//-----------------------------------------------------------------------------

/// Metadata client for the OpenSea v2 HTTP API
pub struct OpenSeaClient {
    /// HTTP client with a bounded per-request timeout
    http: reqwest::Client,

    /// API root including the versioned path prefix
    base_url: String,

    /// Chain slug used in request paths
    chain_slug: String,

    /// Optional API key sent as `x-api-key`
    api_key: Option<String>,
}

impl OpenSeaClient {
    /// Build a client from the lens configuration
    pub fn new(config: &LensConfig) -> LensResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LensError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.metadata_base_url.trim_end_matches('/').to_string(),
            chain_slug: config.chain_slug.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn nft_url(&self, collection: Address, identifier: &str) -> String {
        format!(
            "{}/chain/{}/contract/{:?}/nfts/{}",
            self.base_url, self.chain_slug, collection, identifier
        )
    }
}

#[async_trait]
impl NftMetadataClient for OpenSeaClient {
    async fn fetch_image_url(
        &self,
        collection: Address,
        identifier: &str,
    ) -> LensResult<Option<String>> {
        let url = self.nft_url(collection, identifier);
        tracing::debug!(%url, "Fetching NFT metadata");

        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LensError::metadata_error(format!("Failed to fetch NFT metadata: {}", e)))?;

        if !response.status().is_success() {
            return Err(LensError::metadata_error(format!(
                "Metadata request returned HTTP {}",
                response.status()
            )));
        }

        let envelope: NftEnvelope = response
            .json()
            .await
            .map_err(|e| LensError::metadata_error(format!("Failed to decode NFT metadata: {}", e)))?;

        Ok(envelope.nft.image_url)
    }
}

//-----------------------------------------------------------------------------
// Mock Metadata Client
//-----------------------------------------------------------------------------

/// Mock implementation of the metadata client for testing
pub struct MockNftMetadataClient {
    /// Image URLs stored by token identifier
    images: Arc<Mutex<HashMap<String, String>>>,

    /// Per-identifier failures
    failures: Arc<Mutex<HashMap<String, String>>>,
}

impl MockNftMetadataClient {
    /// Create an empty mock client
    pub fn new() -> Self {
        Self {
            images: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store an image URL for a token identifier
    pub fn set_image(&self, identifier: impl Into<String>, image_url: impl Into<String>) {
        self.images
            .lock()
            .unwrap()
            .insert(identifier.into(), image_url.into());
    }

    /// Make lookups for one identifier fail
    pub fn fail_identifier(&self, identifier: impl Into<String>, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(identifier.into(), message.into());
    }
}

impl Default for MockNftMetadataClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NftMetadataClient for MockNftMetadataClient {
    async fn fetch_image_url(
        &self,
        _collection: Address,
        identifier: &str,
    ) -> LensResult<Option<String>> {
        if let Some(message) = self.failures.lock().unwrap().get(identifier).cloned() {
            return Err(LensError::metadata_error(message));
        }
        Ok(self.images.lock().unwrap().get(identifier).cloned())
    }
}
