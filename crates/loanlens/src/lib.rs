//! loanlens: chain client and display pipeline for Microloan listings
//!
//! This crate fetches active loan requests from a deployed Microloan
//! contract, resolves the collateral NFT image for each loan and shapes
//! everything into an immutable, renderable board.
//!
//! ## Module Organization
//!
//! * **Boundaries**: `session` (wallet bridge), `chain` (loan registry),
//!   `metadata` (NFT metadata client), each a trait with a production
//!   implementation and a mock
//! * **Shaping**: `amount` (fixed-point formatting), `loan` (display
//!   records and batches)
//! * **State and Output**: `board` (epoch-guarded state machine), `loader`
//!   (fetch orchestration), `render` (text output), `watch` (event-driven
//!   refetch loop)
//! * **Support**: `config`, `error`, `logging`

//-----------------------------------------------------------------------------
// Modules
//-----------------------------------------------------------------------------

pub mod amount;
pub mod board;
pub mod chain;
pub mod config;
pub mod error;
pub mod loader;
pub mod loan;
pub mod logging;
pub mod metadata;
pub mod render;
pub mod session;
pub mod watch;

//-----------------------------------------------------------------------------
// Re-exports
//-----------------------------------------------------------------------------

// Boundaries
pub use chain::{ContractLoanRegistry, LoanRegistry, MockLoanRegistry, RawLoan};
pub use metadata::{
    MockNftMetadataClient, NftImageEntry, NftImageLookup, NftMetadataClient, OpenSeaClient,
};
pub use session::{LocalWalletBridge, MockWalletBridge, WalletBridge, WalletEvent, WalletEvents};

// Shaping
pub use amount::{format_amount, parse_amount};
pub use loan::{LoanBatch, LoanRecord, LoanStatus};

// State and output
pub use board::{BoardState, FetchTicket, LoanBoard};
pub use loader::fetch_active_loans;
pub use render::{render_board, render_loan_card};
pub use watch::LoanWatcher;

// Support
pub use config::LensConfig;
pub use error::{LensError, LensResult};
