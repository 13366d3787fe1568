//! Fetch orchestration for the loan board
//!
//! One fetch cycle runs the whole pipeline: authorize through the wallet
//! bridge, enumerate active loan ids, fan out the record reads, fan out the
//! per-loan metadata lookups, assemble the batch. Record failures abort the
//! cycle with a single error; metadata failures attach to their loan and
//! leave the batch intact.

use ethers::utils::to_checksum;
use futures::future;

use crate::chain::registry::LoanRegistry;
use crate::error::{LensError, LensResult};
use crate::loan::{LoanBatch, LoanRecord};
use crate::metadata::{NftImageEntry, NftImageLookup, NftMetadataClient};
use crate::session::WalletBridge;

//-----------------------------------------------------------------------------
// Fetch Cycle
//-----------------------------------------------------------------------------

/// Fetch all active loans and their collateral images
///
/// `bridge` is `None` when no wallet provider exists in the environment;
/// that case fails before anything is fetched. Loans come back in contract
/// enumeration order.
pub async fn fetch_active_loans(
    bridge: Option<&dyn WalletBridge>,
    registry: &dyn LoanRegistry,
    nft: &dyn NftMetadataClient,
) -> LensResult<LoanBatch> {
    let bridge = bridge.ok_or(LensError::WalletMissing)?;

    let accounts = bridge.request_accounts().await?;
    let account = accounts.first().ok_or(LensError::NoAccounts)?;
    tracing::debug!(account = %to_checksum(account, None), "Using authorized account");

    let ids = registry.active_loan_ids().await?;
    tracing::info!(count = ids.len(), "Fetched active loan ids");

    // Any record failure aborts the whole cycle
    let raws = future::try_join_all(ids.iter().map(|id| async move {
        let raw = registry.loan_request(*id).await?;
        Ok::<_, LensError>((*id, raw))
    }))
    .await?;

    // Metadata failures attach to their loan instead
    let entries = future::join_all(raws.iter().map(|(id, raw)| async move {
        let loan_id = id.to_string();
        let identifier = raw.collateral_id.to_string();
        let entry = match nft.fetch_image_url(raw.collateral_token, &identifier).await {
            Ok(image_url) => NftImageEntry::resolved(image_url),
            Err(error) => {
                tracing::warn!(loan_id = %loan_id, error = %error, "Failed to fetch collateral image");
                NftImageEntry::failed(error.to_string())
            }
        };
        (loan_id, entry)
    }))
    .await;
    let images: NftImageLookup = entries.into_iter().collect();

    let loans = raws
        .iter()
        .map(|(id, raw)| LoanRecord::from_raw(*id, raw))
        .collect();

    Ok(LoanBatch { loans, images })
}
