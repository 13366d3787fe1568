//! Mock Loan Registry Implementation
//!
//! This module provides a fully functional mock implementation of the loan
//! registry interface for testing without a node. State lives behind
//! `Arc<Mutex<..>>` so tests can mutate it while the loader holds the
//! registry.

use async_trait::async_trait;
use ethers::types::{Address, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::chain::registry::LoanRegistry;
use crate::chain::types::RawLoan;
use crate::error::{LensError, LensResult};

//-----------------------------------------------------------------------------
// Mock Loan Registry
//-----------------------------------------------------------------------------

/// Mock implementation of a loan registry for testing
pub struct MockLoanRegistry {
    /// Ids reported as active, in order
    active_ids: Arc<Mutex<Vec<U256>>>,

    /// Loan records stored by id
    loans: Arc<Mutex<HashMap<U256, RawLoan>>>,

    /// When set, `active_loan_ids` fails with this message
    ids_failure: Arc<Mutex<Option<String>>>,

    /// Per-id failures for `loan_request`
    loan_failures: Arc<Mutex<HashMap<U256, String>>>,
}

impl MockLoanRegistry {
    /// Create an empty mock registry
    pub fn new() -> Self {
        Self {
            active_ids: Arc::new(Mutex::new(Vec::new())),
            loans: Arc::new(Mutex::new(HashMap::new())),
            ids_failure: Arc::new(Mutex::new(None)),
            loan_failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a loan record and append its id to the active list
    pub fn insert_loan(&self, id: u64, loan: RawLoan) {
        let id = U256::from(id);
        self.loans.lock().unwrap().insert(id, loan);
        self.active_ids.lock().unwrap().push(id);
    }

    /// Replace the active id list without touching stored records
    pub fn set_active_ids(&self, ids: Vec<u64>) {
        *self.active_ids.lock().unwrap() = ids.into_iter().map(U256::from).collect();
    }

    /// Make `active_loan_ids` fail with the given message
    pub fn fail_active_ids(&self, message: impl Into<String>) {
        *self.ids_failure.lock().unwrap() = Some(message.into());
    }

    /// Make `loan_request` fail for one id
    pub fn fail_loan(&self, id: u64, message: impl Into<String>) {
        self.loan_failures
            .lock()
            .unwrap()
            .insert(U256::from(id), message.into());
    }

    /// A plausible active loan record for tests
    pub fn sample_loan(collateral_id: u64, loan_amount: U256) -> RawLoan {
        RawLoan {
            borrower: Address::repeat_byte(0xaa),
            collateral_token: Address::repeat_byte(0xcc),
            collateral_id: U256::from(collateral_id),
            loan_amount,
            interest_rate: U256::from(5u64),
            duration: U256::from(86_400u64),
            start_time: U256::from(1_700_000_000u64),
            lender: Address::repeat_byte(0xbb),
            is_active: true,
            is_funded: true,
            is_repaid: false,
            is_liquidated: false,
        }
    }
}

impl Default for MockLoanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRegistry for MockLoanRegistry {
    async fn active_loan_ids(&self) -> LensResult<Vec<U256>> {
        if let Some(message) = self.ids_failure.lock().unwrap().clone() {
            return Err(LensError::contract_error(message));
        }
        Ok(self.active_ids.lock().unwrap().clone())
    }

    async fn loan_request(&self, id: U256) -> LensResult<RawLoan> {
        if let Some(message) = self.loan_failures.lock().unwrap().get(&id).cloned() {
            return Err(LensError::contract_error(message));
        }
        self.loans
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| LensError::contract_error(format!("No loan stored for id {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_registry_round_trip() {
        let registry = MockLoanRegistry::new();
        registry.insert_loan(1, MockLoanRegistry::sample_loan(7, U256::exp10(18)));
        registry.insert_loan(2, MockLoanRegistry::sample_loan(8, U256::exp10(17)));

        let ids = registry.active_loan_ids().await.unwrap();
        assert_eq!(ids, vec![U256::from(1u64), U256::from(2u64)]);

        let loan = registry.loan_request(U256::from(1u64)).await.unwrap();
        assert_eq!(loan.collateral_id, U256::from(7u64));
    }

    #[tokio::test]
    async fn test_mock_registry_failure_injection() {
        let registry = MockLoanRegistry::new();
        registry.insert_loan(1, MockLoanRegistry::sample_loan(7, U256::exp10(18)));
        registry.fail_loan(1, "execution reverted");

        let err = registry.loan_request(U256::from(1u64)).await.unwrap_err();
        assert_eq!(err.to_string(), "Contract error: execution reverted");

        registry.fail_active_ids("node unreachable");
        let err = registry.active_loan_ids().await.unwrap_err();
        assert_eq!(err.to_string(), "Contract error: node unreachable");
    }

    #[tokio::test]
    async fn test_unknown_id_is_an_error() {
        let registry = MockLoanRegistry::new();
        let err = registry.loan_request(U256::from(9u64)).await.unwrap_err();
        assert!(err.to_string().contains("No loan stored"));
    }
}
