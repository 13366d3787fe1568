//! Wallet session bridge
//!
//! This module defines the boundary between the loan board and the wallet
//! provider. It covers the three things the board needs from a wallet:
//!
//! * **Account access**: `request_accounts` yields the authorized accounts
//! * **Change notifications**: `subscribe` returns a scoped event stream;
//!   dropping the stream deregisters the listener
//! * **Teardown accounting**: `listener_count` exposes how many streams are
//!   currently registered
//!
//! `LocalWalletBridge` backs the interface with a mnemonic-derived signer for
//! headless use. `MockWalletBridge` provides the test double.

use async_trait::async_trait;
use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::error::{LensError, LensResult};

/// Capacity of the wallet event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

//-----------------------------------------------------------------------------
// Wallet Events
//-----------------------------------------------------------------------------

/// Notifications a wallet provider can push to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The set of authorized accounts changed
    AccountsChanged(Vec<Address>),

    /// The wallet switched to a different chain
    ChainChanged(u64),
}

/// Scoped subscription to wallet events
///
/// Each value holds one registered listener. Dropping it deregisters the
/// listener; `recv` returns `None` once the bridge itself is gone.
pub struct WalletEvents {
    rx: broadcast::Receiver<WalletEvent>,
}

impl WalletEvents {
    /// Receive the next wallet event
    ///
    /// Lagged intervals are skipped with a warning rather than surfaced,
    /// since the board always refetches from scratch on any event.
    pub async fn recv(&mut self) -> Option<WalletEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Wallet event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

//-----------------------------------------------------------------------------
// Wallet Bridge Trait
//-----------------------------------------------------------------------------

/// Defines the interface to a wallet provider.
/// Absence of any provider is modeled as `Option<&dyn WalletBridge>` at the
/// call sites, not as an implementation of this trait.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Request the authorized accounts from the wallet
    async fn request_accounts(&self) -> LensResult<Vec<Address>>;

    /// Register a listener for account and chain changes
    fn subscribe(&self) -> WalletEvents;

    /// Number of currently registered event listeners
    fn listener_count(&self) -> usize;
}

//-----------------------------------------------------------------------------
// Local Wallet Bridge
//-----------------------------------------------------------------------------

/// Wallet bridge backed by a mnemonic-derived local signer
///
/// A headless environment has no browser extension pushing events, so
/// `emit` is the hook an embedding application uses to inject them.
pub struct LocalWalletBridge {
    /// Derived signer
    wallet: LocalWallet,

    /// Event fan-out to registered listeners
    events: broadcast::Sender<WalletEvent>,
}

impl std::fmt::Debug for LocalWalletBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWalletBridge")
            .field("address", &self.wallet.address())
            .field("listeners", &self.events.receiver_count())
            .finish()
    }
}

impl LocalWalletBridge {
    /// Create a bridge from a BIP-39 mnemonic, bound to a chain ID
    pub fn new(mnemonic: impl Into<String>, chain_id: u64) -> LensResult<Self> {
        let mnemonic = mnemonic.into();
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(mnemonic.as_str())
            .build()
            .map_err(|e| {
                LensError::config_error(format!("Failed to derive wallet from mnemonic: {}", e))
            })?
            .with_chain_id(chain_id);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self { wallet, events })
    }

    /// Address of the derived account
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Push a wallet event to all registered listeners
    pub fn emit(&self, event: WalletEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl WalletBridge for LocalWalletBridge {
    async fn request_accounts(&self) -> LensResult<Vec<Address>> {
        Ok(vec![self.wallet.address()])
    }

    fn subscribe(&self) -> WalletEvents {
        WalletEvents {
            rx: self.events.subscribe(),
        }
    }

    fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }
}

//-----------------------------------------------------------------------------
// Mock Wallet Bridge
//-----------------------------------------------------------------------------

/// Mock implementation of a wallet bridge for testing
pub struct MockWalletBridge {
    /// Accounts returned by `request_accounts`
    accounts: Arc<Mutex<Vec<Address>>>,

    /// When set, `request_accounts` fails with this message
    failure: Arc<Mutex<Option<String>>>,

    /// Event fan-out to registered listeners
    events: broadcast::Sender<WalletEvent>,
}

impl MockWalletBridge {
    /// Create a mock bridge exposing the given accounts
    pub fn new(accounts: Vec<Address>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
            failure: Arc::new(Mutex::new(None)),
            events,
        }
    }

    /// Create a mock bridge with a single fixed account
    pub fn with_account() -> Self {
        Self::new(vec![Address::repeat_byte(0x11)])
    }

    /// Replace the exposed accounts
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    /// Make subsequent `request_accounts` calls fail
    pub fn fail_requests(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Push a wallet event to all registered listeners
    pub fn emit(&self, event: WalletEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl WalletBridge for MockWalletBridge {
    async fn request_accounts(&self) -> LensResult<Vec<Address>> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(LensError::wallet_error(message));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    fn subscribe(&self) -> WalletEvents {
        WalletEvents {
            rx: self.events.subscribe(),
        }
    }

    fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }
}
