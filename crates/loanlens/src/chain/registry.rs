//! Loan registry interface and contract-backed implementation
//!
//! `LoanRegistry` is the read boundary to the Microloan contract: enumerate
//! active loan ids, then fetch individual records. `ContractLoanRegistry`
//! implements it with abigen bindings over an HTTP provider and a
//! mnemonic-derived signer.

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use ethers::types::{Address, U256};
use std::sync::Arc;

use crate::chain::types::RawLoan;
use crate::config::LensConfig;
use crate::error::{LensError, LensResult};

//-----------------------------------------------------------------------------
// Contract Bindings
//-----------------------------------------------------------------------------

abigen!(
    Microloan,
    r#"[
        function getActiveLoanRequests() external view returns (uint256[])
        function loanRequests(uint256) external view returns (address, address, uint256, uint256, uint256, uint256, uint256, address, bool, bool, bool, bool)
    ]"#
);

/// Signer-backed client the bindings run on
pub type ContractClient = SignerMiddleware<Provider<Http>, LocalWallet>;

//-----------------------------------------------------------------------------
// Loan Registry Trait
//-----------------------------------------------------------------------------

/// Defines the read interface to the loan contract.
/// This trait allows the loader to run against the deployed contract or a
/// mock without changing shape.
#[async_trait]
pub trait LoanRegistry: Send + Sync {
    /// Ids of all currently active loan requests, in contract order
    async fn active_loan_ids(&self) -> LensResult<Vec<U256>>;

    /// The stored loan record for one id
    async fn loan_request(&self, id: U256) -> LensResult<RawLoan>;
}

//-----------------------------------------------------------------------------
// Contract-Backed Registry
//-----------------------------------------------------------------------------

/// Loan registry reading from the deployed Microloan contract
pub struct ContractLoanRegistry {
    /// Bound contract instance
    contract: Microloan<ContractClient>,
}

impl std::fmt::Debug for ContractLoanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractLoanRegistry")
            .field("contract", &self.contract.address())
            .finish()
    }
}

impl ContractLoanRegistry {
    /// Connect to the contract described by the configuration
    pub fn new(config: &LensConfig) -> LensResult<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.clone())
            .map_err(|e| LensError::config_error(format!("Failed to create provider: {}", e)))?;

        let wallet = MnemonicBuilder::<English>::default()
            .phrase(config.mnemonic.as_str())
            .build()
            .map_err(|e| {
                LensError::config_error(format!("Failed to derive wallet from mnemonic: {}", e))
            })?
            .with_chain_id(config.chain_id);

        let address = config.contract_address()?;
        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        Ok(Self {
            contract: Microloan::new(address, client),
        })
    }

    /// Address of the bound contract
    pub fn address(&self) -> Address {
        self.contract.address()
    }
}

#[async_trait]
impl LoanRegistry for ContractLoanRegistry {
    async fn active_loan_ids(&self) -> LensResult<Vec<U256>> {
        self.contract
            .get_active_loan_requests()
            .call()
            .await
            .map_err(|e| {
                LensError::contract_error(format!("Failed to fetch active loan ids: {}", e))
            })
    }

    async fn loan_request(&self, id: U256) -> LensResult<RawLoan> {
        let fields = self
            .contract
            .loan_requests(id)
            .call()
            .await
            .map_err(|e| LensError::contract_error(format!("Failed to fetch loan {}: {}", id, e)))?;
        Ok(RawLoan::from(fields))
    }
}
