//! Event-driven refetch loop
//!
//! `LoanWatcher` keeps a board current against wallet events. Each account
//! or chain change aborts whatever fetch is still in flight and starts a
//! fresh cycle under a new epoch; the board's ticket check drops anything a
//! superseded cycle still manages to deliver. Dropping the watcher aborts
//! the in-flight task and releases its event subscription, so no listener
//! or request outlives it.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::board::{BoardState, LoanBoard};
use crate::chain::registry::LoanRegistry;
use crate::loader::fetch_active_loans;
use crate::metadata::NftMetadataClient;
use crate::session::{WalletBridge, WalletEvent, WalletEvents};

//-----------------------------------------------------------------------------
// Loan Watcher
//-----------------------------------------------------------------------------

/// Drives fetch cycles from wallet events
pub struct LoanWatcher {
    bridge: Arc<dyn WalletBridge>,
    registry: Arc<dyn LoanRegistry>,
    nft: Arc<dyn NftMetadataClient>,

    /// Shared board the cycles complete into
    board: Arc<Mutex<LoanBoard>>,

    /// State snapshots published after every transition
    updates: Arc<watch::Sender<BoardState>>,

    /// Scoped wallet event subscription, released on drop
    events: WalletEvents,

    /// Currently running fetch task, if any
    inflight: Option<JoinHandle<()>>,
}

impl LoanWatcher {
    /// Create a watcher over the given boundaries and subscribe to wallet
    /// events immediately
    pub fn new(
        bridge: Arc<dyn WalletBridge>,
        registry: Arc<dyn LoanRegistry>,
        nft: Arc<dyn NftMetadataClient>,
    ) -> Self {
        let (updates, _) = watch::channel(BoardState::Idle);
        Self {
            events: bridge.subscribe(),
            bridge,
            registry,
            nft,
            board: Arc::new(Mutex::new(LoanBoard::new())),
            updates: Arc::new(updates),
            inflight: None,
        }
    }

    /// Handle to the shared board
    pub fn board(&self) -> Arc<Mutex<LoanBoard>> {
        Arc::clone(&self.board)
    }

    /// Subscribe to state snapshots, one per board transition
    pub fn subscribe_updates(&self) -> watch::Receiver<BoardState> {
        self.updates.subscribe()
    }

    /// Abort any in-flight cycle and start a new one
    pub fn refresh(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }

        let ticket = self.board.lock().unwrap().begin_fetch();
        self.updates.send_replace(BoardState::Loading);

        let bridge = Arc::clone(&self.bridge);
        let registry = Arc::clone(&self.registry);
        let nft = Arc::clone(&self.nft);
        let board = Arc::clone(&self.board);
        let updates = Arc::clone(&self.updates);

        self.inflight = Some(tokio::spawn(async move {
            let result =
                fetch_active_loans(Some(bridge.as_ref()), registry.as_ref(), nft.as_ref()).await;

            let mut board = board.lock().unwrap();
            if board.complete(ticket, result) {
                updates.send_replace(board.state().clone());
            }
        }));
    }

    /// Wait for the current cycle, if any, to finish
    pub async fn settle(&mut self) {
        if let Some(handle) = self.inflight.take() {
            let _ = handle.await;
        }
    }

    /// Run the initial fetch, then refetch on every wallet event until the
    /// bridge goes away
    pub async fn run(mut self) {
        self.refresh();

        while let Some(event) = self.events.recv().await {
            match &event {
                WalletEvent::AccountsChanged(accounts) => {
                    tracing::info!(count = accounts.len(), "Accounts changed, refetching");
                }
                WalletEvent::ChainChanged(chain_id) => {
                    tracing::info!(chain_id = *chain_id, "Chain changed, refetching");
                }
            }
            self.refresh();
        }

        tracing::debug!("Wallet event stream closed, watcher stopping");
    }
}

impl Drop for LoanWatcher {
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockLoanRegistry;
    use crate::metadata::MockNftMetadataClient;
    use crate::session::MockWalletBridge;
    use ethers::types::U256;

    fn watcher_parts() -> (
        Arc<MockWalletBridge>,
        Arc<MockLoanRegistry>,
        Arc<MockNftMetadataClient>,
    ) {
        (
            Arc::new(MockWalletBridge::with_account()),
            Arc::new(MockLoanRegistry::new()),
            Arc::new(MockNftMetadataClient::new()),
        )
    }

    #[tokio::test]
    async fn test_refresh_loads_the_board() {
        let (bridge, registry, nft) = watcher_parts();
        registry.insert_loan(1, MockLoanRegistry::sample_loan(7, U256::exp10(18)));

        let mut watcher = LoanWatcher::new(bridge, registry, nft);
        let board = watcher.board();

        watcher.refresh();
        assert_eq!(*board.lock().unwrap().state(), BoardState::Loading);

        watcher.settle().await;
        let state = board.lock().unwrap().state().clone();
        match state {
            BoardState::Loaded(batch) => assert_eq!(batch.loans.len(), 1),
            other => panic!("expected loaded board, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_updates_channel_tracks_transitions() {
        let (bridge, registry, nft) = watcher_parts();

        let mut watcher = LoanWatcher::new(bridge, registry, nft);
        let mut updates = watcher.subscribe_updates();
        assert_eq!(*updates.borrow(), BoardState::Idle);

        watcher.refresh();
        watcher.settle().await;

        updates.changed().await.unwrap();
        let snapshot = updates.borrow_and_update().clone();
        assert_eq!(snapshot, BoardState::Loaded(crate::loan::LoanBatch::empty()));
    }

    #[tokio::test]
    async fn test_drop_releases_event_subscription() {
        let (bridge, registry, nft) = watcher_parts();
        assert_eq!(bridge.listener_count(), 0);

        let watcher = LoanWatcher::new(bridge.clone(), registry, nft);
        assert_eq!(bridge.listener_count(), 1);

        drop(watcher);
        assert_eq!(bridge.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_run_refetches_on_wallet_events() {
        let (bridge, registry, nft) = watcher_parts();

        let watcher = LoanWatcher::new(bridge.clone(), registry.clone(), nft);
        let mut updates = watcher.subscribe_updates();
        let runner = tokio::spawn(watcher.run());

        // Initial cycle loads an empty batch
        loop {
            updates.changed().await.unwrap();
            let snapshot = updates.borrow_and_update().clone();
            if let BoardState::Loaded(batch) = snapshot {
                assert!(batch.is_empty());
                break;
            }
        }

        // A wallet event triggers a refetch that sees the new loan
        registry.insert_loan(1, MockLoanRegistry::sample_loan(7, U256::exp10(18)));
        bridge.emit(WalletEvent::ChainChanged(80002));
        loop {
            updates.changed().await.unwrap();
            let snapshot = updates.borrow_and_update().clone();
            if let BoardState::Loaded(batch) = snapshot {
                assert_eq!(batch.loans.len(), 1);
                break;
            }
        }

        runner.abort();
        let _ = runner.await;
        assert_eq!(bridge.listener_count(), 0);
    }
}
