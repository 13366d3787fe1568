//! Configuration for the loan viewing pipeline
//!
//! `LensConfig` carries everything the contract registry, wallet bridge and
//! metadata client need: RPC endpoint, chain identity, contract address,
//! signer mnemonic and the NFT metadata API location. Values come from
//! defaults, the environment (`from_env`) or direct construction.

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::error::{LensError, LensResult};

/// Deployed Microloan contract on Polygon Amoy
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x68f4d8e650c5b89983f531f9451717002e35c030";

/// OpenSea testnet API root, including the versioned path prefix
pub const DEFAULT_METADATA_BASE_URL: &str = "https://testnets-api.opensea.io/api/v2";

/// Hardhat's well-known development mnemonic, matching the default local node
pub const DEFAULT_DEV_MNEMONIC: &str =
    "test test test test test test test test test test test junk";

//-----------------------------------------------------------------------------
// Lens Configuration
//-----------------------------------------------------------------------------

/// Configuration for chain access and NFT metadata lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensConfig {
    /// RPC URL of the EVM node
    pub rpc_url: String,

    /// Numeric chain ID the signer is bound to
    pub chain_id: u64,

    /// Address of the deployed Microloan contract
    pub contract_address: String,

    /// BIP-39 mnemonic the local wallet derives its account from
    ///
    /// Defaults to the development mnemonic; real deployments override it
    /// through `LOANLENS_MNEMONIC`.
    pub mnemonic: String,

    /// Base URL of the NFT metadata API, including any fixed path prefix
    pub metadata_base_url: String,

    /// Chain slug used in metadata API paths (e.g. "amoy")
    pub chain_slug: String,

    /// Optional API key sent with metadata requests
    pub api_key: Option<String>,

    /// Per-request timeout for metadata lookups, in seconds
    pub request_timeout_secs: u64,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 80002,
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            mnemonic: DEFAULT_DEV_MNEMONIC.to_string(),
            metadata_base_url: DEFAULT_METADATA_BASE_URL.to_string(),
            chain_slug: "amoy".to_string(),
            api_key: None,
            request_timeout_secs: 30,
        }
    }
}

impl LensConfig {
    /// Load configuration from the environment, falling back to defaults
    ///
    /// Recognized variables: `LOANLENS_RPC_URL`, `LOANLENS_CHAIN_ID`,
    /// `LOANLENS_CONTRACT_ADDRESS`, `LOANLENS_MNEMONIC`,
    /// `LOANLENS_METADATA_URL`, `LOANLENS_CHAIN_SLUG`,
    /// `LOANLENS_OPENSEA_API_KEY`, `LOANLENS_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> LensResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("LOANLENS_RPC_URL") {
            config.rpc_url = value;
        }
        if let Ok(value) = env::var("LOANLENS_CHAIN_ID") {
            config.chain_id = value
                .parse()
                .map_err(|e| LensError::config_error(format!("Invalid LOANLENS_CHAIN_ID: {}", e)))?;
        }
        if let Ok(value) = env::var("LOANLENS_CONTRACT_ADDRESS") {
            config.contract_address = value;
        }
        if let Ok(value) = env::var("LOANLENS_MNEMONIC") {
            config.mnemonic = value;
        }
        if let Ok(value) = env::var("LOANLENS_METADATA_URL") {
            config.metadata_base_url = value;
        }
        if let Ok(value) = env::var("LOANLENS_CHAIN_SLUG") {
            config.chain_slug = value;
        }
        if let Ok(value) = env::var("LOANLENS_OPENSEA_API_KEY") {
            config.api_key = Some(value);
        }
        if let Ok(value) = env::var("LOANLENS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = value.parse().map_err(|e| {
                LensError::config_error(format!("Invalid LOANLENS_REQUEST_TIMEOUT_SECS: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that URLs and the contract address parse
    pub fn validate(&self) -> LensResult<()> {
        Url::parse(&self.rpc_url).map_err(|e| {
            LensError::config_error(format!("Invalid RPC URL '{}': {}", self.rpc_url, e))
        })?;
        Url::parse(&self.metadata_base_url).map_err(|e| {
            LensError::config_error(format!(
                "Invalid metadata base URL '{}': {}",
                self.metadata_base_url, e
            ))
        })?;
        self.contract_address.parse::<Address>().map_err(|e| {
            LensError::config_error(format!(
                "Invalid contract address '{}': {}",
                self.contract_address, e
            ))
        })?;
        Ok(())
    }

    /// Parsed form of the contract address
    pub fn contract_address(&self) -> LensResult<Address> {
        self.contract_address.parse::<Address>().map_err(|e| {
            LensError::config_error(format!(
                "Invalid contract address '{}': {}",
                self.contract_address, e
            ))
        })
    }
}
