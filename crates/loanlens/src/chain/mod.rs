//! Chain access for the loan board
//!
//! This module holds everything that talks to the Microloan contract:
//!
//! * **Record Types**: `types.rs` defines the raw on-chain loan shape
//!
//! * **Registry Interface**: `registry.rs` defines the `LoanRegistry` trait
//!   and the abigen-backed `ContractLoanRegistry`
//!
//! * **Testing Utilities**: `mock.rs` provides a test implementation of the
//!   registry interface

//-----------------------------------------------------------------------------
// Modules
//-----------------------------------------------------------------------------

pub mod mock;
pub mod registry;
pub mod types;

//-----------------------------------------------------------------------------
// Re-exports
//-----------------------------------------------------------------------------

pub use mock::*;
pub use registry::*;
pub use types::*;
