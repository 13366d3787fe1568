//! Text rendering of the loan board
//!
//! Pure functions from state to output. Every display state renders under
//! the "Active Loans" title; cards list their fields as `Label: value`
//! lines in a fixed order, with the collateral image reference first.

use crate::board::BoardState;
use crate::loan::LoanRecord;
use crate::metadata::NftImageEntry;

/// Board title shown in every display state
pub const BOARD_TITLE: &str = "Active Loans";

/// Shown while a fetch cycle is in flight
pub const LOADING_TEXT: &str = "Loading...";

/// Shown when a cycle loads zero loans
pub const EMPTY_TEXT: &str = "No active loans available.";

//-----------------------------------------------------------------------------
// Board Rendering
//-----------------------------------------------------------------------------

/// Render the whole board for one display state
pub fn render_board(state: &BoardState) -> String {
    let mut out = String::new();
    out.push_str(BOARD_TITLE);
    out.push('\n');

    match state {
        BoardState::Idle | BoardState::Loading => {
            out.push_str(LOADING_TEXT);
            out.push('\n');
        }
        BoardState::Error(message) => {
            out.push_str(message);
            out.push('\n');
        }
        BoardState::Loaded(batch) => {
            if batch.is_empty() {
                out.push_str(EMPTY_TEXT);
                out.push('\n');
            } else {
                for record in &batch.loans {
                    out.push('\n');
                    out.push_str(&render_loan_card(record, batch.images.get(&record.id)));
                }
            }
        }
    }

    out
}

//-----------------------------------------------------------------------------
// Card Rendering
//-----------------------------------------------------------------------------

/// Render one loan card with its image entry
pub fn render_loan_card(record: &LoanRecord, image: Option<&NftImageEntry>) -> String {
    let mut out = String::new();

    if let Some(entry) = image {
        if let Some(url) = &entry.image_url {
            out.push_str(&format!("Image: {}\n", url));
        } else if let Some(error) = &entry.error {
            out.push_str(&format!("Image unavailable: {}\n", error));
        }
    }

    out.push_str(&format!("Loan ID: {}\n", record.id));
    out.push_str(&format!("Borrower: {}\n", record.borrower));
    out.push_str(&format!("Collateral Token: {}\n", record.collateral_token));
    out.push_str(&format!("Collateral ID: {}\n", record.collateral_id));
    out.push_str(&format!("Loan Amount: {} ETH\n", record.loan_amount));
    out.push_str(&format!("Interest Rate: {}%\n", record.interest_rate));
    out.push_str(&format!("Duration: {} seconds\n", record.duration));
    out.push_str(&format!("Start Time: {}\n", record.start_time));
    out.push_str(&format!("Lender: {}\n", record.lender));
    out.push_str(&format!("Status: {}\n", record.status().label()));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::chain::mock::MockLoanRegistry;
    use crate::loan::{LoanBatch, LoanRecord};
    use crate::metadata::NftImageLookup;
    use ethers::types::U256;

    fn loaded_batch() -> LoanBatch {
        let raw = MockLoanRegistry::sample_loan(7, U256::exp10(18));
        let record = LoanRecord::from_raw(U256::from(1u64), &raw);
        let mut images = NftImageLookup::new();
        images.insert(
            "1".to_string(),
            NftImageEntry::resolved(Some("https://img.example/7.png".to_string())),
        );
        LoanBatch {
            loans: vec![record],
            images,
        }
    }

    #[test]
    fn test_loading_states_render_loading_text() {
        assert_eq!(render_board(&BoardState::Idle), "Active Loans\nLoading...\n");
        assert_eq!(
            render_board(&BoardState::Loading),
            "Active Loans\nLoading...\n"
        );
    }

    #[test]
    fn test_error_state_renders_message_under_title() {
        let state = BoardState::Error(
            "Please install MetaMask or another Ethereum wallet.".to_string(),
        );
        assert_eq!(
            render_board(&state),
            "Active Loans\nPlease install MetaMask or another Ethereum wallet.\n"
        );
    }

    #[test]
    fn test_empty_batch_renders_empty_text() {
        let state = BoardState::Loaded(LoanBatch::empty());
        assert_eq!(
            render_board(&state),
            "Active Loans\nNo active loans available.\n"
        );
    }

    #[test]
    fn test_card_lists_fields_in_order() {
        let batch = loaded_batch();
        let out = render_board(&BoardState::Loaded(batch));

        assert!(out.starts_with("Active Loans\n"));
        let image_pos = out.find("Image: https://img.example/7.png").unwrap();
        let id_pos = out.find("Loan ID: 1").unwrap();
        let amount_pos = out.find("Loan Amount: 1.0 ETH").unwrap();
        let rate_pos = out.find("Interest Rate: 5%").unwrap();
        let duration_pos = out.find("Duration: 86400 seconds").unwrap();
        let status_pos = out.find("Status: Active").unwrap();

        assert!(image_pos < id_pos);
        assert!(id_pos < amount_pos);
        assert!(amount_pos < rate_pos);
        assert!(rate_pos < duration_pos);
        assert!(duration_pos < status_pos);
    }

    #[test]
    fn test_card_surfaces_per_loan_image_error() {
        let raw = MockLoanRegistry::sample_loan(7, U256::exp10(18));
        let record = LoanRecord::from_raw(U256::from(1u64), &raw);
        let entry = NftImageEntry::failed("Metadata error: HTTP 500");

        let card = render_loan_card(&record, Some(&entry));
        assert!(card.starts_with("Image unavailable: Metadata error: HTTP 500\n"));
        assert!(card.contains("Loan ID: 1\n"));
    }

    #[test]
    fn test_card_without_image_entry_omits_image_line() {
        let raw = MockLoanRegistry::sample_loan(7, U256::exp10(18));
        let record = LoanRecord::from_raw(U256::from(1u64), &raw);

        let card = render_loan_card(&record, None);
        assert!(card.starts_with("Loan ID: 1\n"));
        assert!(!card.contains("Image"));
    }
}
