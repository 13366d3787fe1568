//! Display-shaped loan records
//!
//! `LoanRecord` is the immutable card model: every field is already a
//! string in the form the render layer prints. Records are built fresh from
//! `RawLoan` each fetch cycle and never mutated afterwards.

use chrono::DateTime;
use ethers::types::{Address, U256};
use ethers::utils::to_checksum;

use crate::amount::format_amount;
use crate::chain::types::RawLoan;
use crate::metadata::NftImageLookup;

//-----------------------------------------------------------------------------
// Loan Status
//-----------------------------------------------------------------------------

/// Lifecycle label of a loan
///
/// Repayment wins over liquidation when a record carries both flags; any
/// other listed record counts as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Repaid,
    Liquidated,
}

impl LoanStatus {
    /// Derive the status from the record's terminal flags
    pub fn from_flags(is_repaid: bool, is_liquidated: bool) -> Self {
        if is_repaid {
            LoanStatus::Repaid
        } else if is_liquidated {
            LoanStatus::Liquidated
        } else {
            LoanStatus::Active
        }
    }

    /// Display label for the card
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Repaid => "Repaid",
            LoanStatus::Liquidated => "Liquidated",
        }
    }
}

//-----------------------------------------------------------------------------
// Loan Record
//-----------------------------------------------------------------------------

/// One loan shaped for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRecord {
    /// Stringified loan id
    pub id: String,

    /// Checksummed borrower address
    pub borrower: String,

    /// Checksummed collateral collection address
    pub collateral_token: String,

    /// Stringified collateral token identifier
    pub collateral_id: String,

    /// Amount as an 18-decimal fixed-point string
    pub loan_amount: String,

    /// Interest rate in whole percent
    pub interest_rate: String,

    /// Duration in seconds
    pub duration: String,

    /// Funding time formatted for display
    pub start_time: String,

    /// Funding time in raw unix seconds
    pub start_time_secs: U256,

    /// Checksummed lender address, or "None" while unfunded
    pub lender: String,

    pub is_active: bool,
    pub is_funded: bool,
    pub is_repaid: bool,
    pub is_liquidated: bool,
}

impl LoanRecord {
    /// Shape a raw on-chain record for display
    pub fn from_raw(id: U256, raw: &RawLoan) -> Self {
        let lender = if raw.lender == Address::zero() {
            "None".to_string()
        } else {
            to_checksum(&raw.lender, None)
        };

        Self {
            id: id.to_string(),
            borrower: to_checksum(&raw.borrower, None),
            collateral_token: to_checksum(&raw.collateral_token, None),
            collateral_id: raw.collateral_id.to_string(),
            loan_amount: format_amount(raw.loan_amount),
            interest_rate: raw.interest_rate.to_string(),
            duration: raw.duration.to_string(),
            start_time: format_timestamp(raw.start_time),
            start_time_secs: raw.start_time,
            lender,
            is_active: raw.is_active,
            is_funded: raw.is_funded,
            is_repaid: raw.is_repaid,
            is_liquidated: raw.is_liquidated,
        }
    }

    /// Lifecycle label of this record
    pub fn status(&self) -> LoanStatus {
        LoanStatus::from_flags(self.is_repaid, self.is_liquidated)
    }
}

/// Render a unix timestamp for display, falling back to the raw seconds
/// when the value does not fit a calendar date
fn format_timestamp(raw: U256) -> String {
    if raw > U256::from(u64::MAX) {
        return raw.to_string();
    }
    match i64::try_from(raw.as_u64())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
    {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => raw.to_string(),
    }
}

//-----------------------------------------------------------------------------
// Loan Batch
//-----------------------------------------------------------------------------

/// One fetch cycle's complete result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanBatch {
    /// Records in contract enumeration order
    pub loans: Vec<LoanRecord>,

    /// Per-loan image lookup keyed by loan id
    pub images: NftImageLookup,
}

impl LoanBatch {
    /// Batch with no loans and no images
    pub fn empty() -> Self {
        Self {
            loans: Vec::new(),
            images: NftImageLookup::new(),
        }
    }

    /// True when the batch carries no loans
    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockLoanRegistry;

    #[test]
    fn test_status_priority_over_all_flag_pairs() {
        assert_eq!(LoanStatus::from_flags(false, false), LoanStatus::Active);
        assert_eq!(LoanStatus::from_flags(false, true), LoanStatus::Liquidated);
        assert_eq!(LoanStatus::from_flags(true, false), LoanStatus::Repaid);
        // Repayment wins when both terminal flags are set
        assert_eq!(LoanStatus::from_flags(true, true), LoanStatus::Repaid);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(LoanStatus::Active.label(), "Active");
        assert_eq!(LoanStatus::Repaid.label(), "Repaid");
        assert_eq!(LoanStatus::Liquidated.label(), "Liquidated");
    }

    #[test]
    fn test_unfunded_lender_renders_as_none() {
        let mut raw = MockLoanRegistry::sample_loan(7, U256::exp10(18));
        raw.lender = Address::zero();

        let record = LoanRecord::from_raw(U256::from(2u64), &raw);
        assert_eq!(record.lender, "None");
    }

    #[test]
    fn test_funded_lender_is_checksummed() {
        let raw = MockLoanRegistry::sample_loan(7, U256::exp10(18));
        let record = LoanRecord::from_raw(U256::from(1u64), &raw);

        assert_eq!(record.lender, to_checksum(&raw.lender, None));
        assert!(record.lender.starts_with("0x"));
        assert_eq!(record.lender.len(), 42);
    }

    #[test]
    fn test_from_raw_shapes_all_fields() {
        let raw = MockLoanRegistry::sample_loan(7, U256::exp10(18));
        let record = LoanRecord::from_raw(U256::from(1u64), &raw);

        assert_eq!(record.id, "1");
        assert_eq!(record.collateral_id, "7");
        assert_eq!(record.loan_amount, "1.0");
        assert_eq!(record.interest_rate, "5");
        assert_eq!(record.duration, "86400");
        assert_eq!(record.status(), LoanStatus::Active);
        assert!(record.is_active);
    }

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(
            format_timestamp(U256::from(1_700_000_000u64)),
            "2023-11-14 22:13:20 UTC"
        );
        assert_eq!(format_timestamp(U256::zero()), "1970-01-01 00:00:00 UTC");
        // Values beyond calendar range fall back to raw seconds
        assert_eq!(format_timestamp(U256::MAX), U256::MAX.to_string());
    }

    #[test]
    fn test_empty_batch() {
        let batch = LoanBatch::empty();
        assert!(batch.is_empty());
        assert!(batch.images.is_empty());
    }
}
