//! On-chain loan record types
//!
//! `RawLoan` mirrors the Microloan contract's `loanRequests` storage struct
//! field for field. Amounts and terms stay as `U256` here; display shaping
//! happens later in `loan::LoanRecord`.

use ethers::types::{Address, U256};

//-----------------------------------------------------------------------------
// Raw Loan Record
//-----------------------------------------------------------------------------

/// One loan request as stored by the contract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLoan {
    /// Account that opened the request
    pub borrower: Address,

    /// NFT collection backing the loan
    pub collateral_token: Address,

    /// Token identifier within the collection
    pub collateral_id: U256,

    /// Requested amount in raw 18-decimal units
    pub loan_amount: U256,

    /// Interest rate in whole percent
    pub interest_rate: U256,

    /// Loan duration in seconds
    pub duration: U256,

    /// Funding time as a unix timestamp, zero until funded
    pub start_time: U256,

    /// Funding account, zero address until funded
    pub lender: Address,

    /// Request is open and listed
    pub is_active: bool,

    /// A lender has funded the request
    pub is_funded: bool,

    /// Loan has been repaid
    pub is_repaid: bool,

    /// Collateral has been seized
    pub is_liquidated: bool,
}

/// Field tuple as returned by the contract's public mapping getter
pub type RawLoanFields = (
    Address,
    Address,
    U256,
    U256,
    U256,
    U256,
    U256,
    Address,
    bool,
    bool,
    bool,
    bool,
);

impl From<RawLoanFields> for RawLoan {
    fn from(fields: RawLoanFields) -> Self {
        let (
            borrower,
            collateral_token,
            collateral_id,
            loan_amount,
            interest_rate,
            duration,
            start_time,
            lender,
            is_active,
            is_funded,
            is_repaid,
            is_liquidated,
        ) = fields;
        Self {
            borrower,
            collateral_token,
            collateral_id,
            loan_amount,
            interest_rate,
            duration,
            start_time,
            lender,
            is_active,
            is_funded,
            is_repaid,
            is_liquidated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_loan_from_getter_tuple() {
        let borrower = Address::repeat_byte(0x01);
        let collection = Address::repeat_byte(0x02);
        let fields: RawLoanFields = (
            borrower,
            collection,
            U256::from(7u64),
            U256::exp10(18),
            U256::from(5u64),
            U256::from(86_400u64),
            U256::from(1_700_000_000u64),
            Address::zero(),
            true,
            false,
            false,
            false,
        );

        let raw = RawLoan::from(fields);
        assert_eq!(raw.borrower, borrower);
        assert_eq!(raw.collateral_token, collection);
        assert_eq!(raw.collateral_id, U256::from(7u64));
        assert_eq!(raw.loan_amount, U256::exp10(18));
        assert_eq!(raw.lender, Address::zero());
        assert!(raw.is_active);
        assert!(!raw.is_funded);
    }
}
