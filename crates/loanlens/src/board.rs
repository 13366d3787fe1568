//! Board state machine
//!
//! The board owns a single explicit display state and moves through it in
//! one direction per fetch cycle: `Loading` then `Loaded` or `Error`. Each
//! cycle gets a ticket stamped with the current epoch; completing with a
//! stale ticket is a no-op, so a superseded fetch can never overwrite the
//! cycle that replaced it.

use crate::error::LensError;
use crate::loan::LoanBatch;

//-----------------------------------------------------------------------------
// Board State
//-----------------------------------------------------------------------------

/// Display state of the loan board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardState {
    /// No fetch has started yet
    Idle,

    /// A fetch cycle is in flight
    Loading,

    /// The last cycle completed with this batch
    Loaded(LoanBatch),

    /// The last cycle failed with this message
    Error(String),
}

impl BoardState {
    /// True while a cycle is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, BoardState::Idle | BoardState::Loading)
    }

    /// The loaded batch, if any
    pub fn batch(&self) -> Option<&LoanBatch> {
        match self {
            BoardState::Loaded(batch) => Some(batch),
            _ => None,
        }
    }
}

//-----------------------------------------------------------------------------
// Epoch-Guarded Board
//-----------------------------------------------------------------------------

/// Proof that a fetch cycle was started; carries the cycle's epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
}

/// Loan board with epoch-guarded state transitions
#[derive(Debug, Clone)]
pub struct LoanBoard {
    state: BoardState,
    epoch: u64,
}

impl LoanBoard {
    /// Create an idle board
    pub fn new() -> Self {
        Self {
            state: BoardState::Idle,
            epoch: 0,
        }
    }

    /// Current display state
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Epoch of the most recently started cycle
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a fetch cycle: bump the epoch, enter `Loading`, hand out the
    /// ticket the cycle must present on completion
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.epoch += 1;
        self.state = BoardState::Loading;
        FetchTicket { epoch: self.epoch }
    }

    /// Complete a fetch cycle
    ///
    /// Applies the result only when the ticket belongs to the current epoch
    /// and returns whether it was applied. Stale tickets leave the state
    /// untouched.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<LoanBatch, LensError>) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "Dropping superseded fetch result"
            );
            return false;
        }
        self.state = match result {
            Ok(batch) => BoardState::Loaded(batch),
            Err(error) => BoardState::Error(error.to_string()),
        };
        true
    }
}

impl Default for LoanBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cycle_transitions() {
        let mut board = LoanBoard::new();
        assert_eq!(*board.state(), BoardState::Idle);
        assert!(board.state().is_loading());

        let ticket = board.begin_fetch();
        assert_eq!(*board.state(), BoardState::Loading);

        assert!(board.complete(ticket, Ok(LoanBatch::empty())));
        assert_eq!(*board.state(), BoardState::Loaded(LoanBatch::empty()));
        assert!(!board.state().is_loading());
    }

    #[test]
    fn test_error_completion() {
        let mut board = LoanBoard::new();
        let ticket = board.begin_fetch();

        assert!(board.complete(ticket, Err(LensError::WalletMissing)));
        assert_eq!(
            *board.state(),
            BoardState::Error("Please install MetaMask or another Ethereum wallet.".to_string())
        );
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let mut board = LoanBoard::new();
        let first = board.begin_fetch();
        let second = board.begin_fetch();

        // The superseded cycle completes first and must not apply
        assert!(!board.complete(first, Err(LensError::contract_error("old cycle"))));
        assert_eq!(*board.state(), BoardState::Loading);

        assert!(board.complete(second, Ok(LoanBatch::empty())));
        assert_eq!(*board.state(), BoardState::Loaded(LoanBatch::empty()));
    }

    #[test]
    fn test_stale_ticket_after_completion() {
        let mut board = LoanBoard::new();
        let first = board.begin_fetch();
        let second = board.begin_fetch();

        assert!(board.complete(second, Ok(LoanBatch::empty())));
        // The old cycle resolving late must not clobber the newer result
        assert!(!board.complete(first, Err(LensError::contract_error("late failure"))));
        assert_eq!(*board.state(), BoardState::Loaded(LoanBatch::empty()));
    }

    #[test]
    fn test_epochs_are_monotonic() {
        let mut board = LoanBoard::new();
        assert_eq!(board.epoch(), 0);
        board.begin_fetch();
        board.begin_fetch();
        assert_eq!(board.epoch(), 2);
    }
}
