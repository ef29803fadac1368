//! The ledger client collaborator.

use async_trait::async_trait;
use pop_types::{IdentityRef, InstanceId};

use crate::{ClientTransaction, LedgerError, Proof, TxOutcome};

/// Submits transactions to the ledger and reads back authoritative state.
///
/// Retry and inclusion-timeout policy belong to the implementation.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit `tx` and wait until the ledger has included or rejected it.
    async fn submit_and_await(&self, tx: ClientTransaction) -> Result<TxOutcome, LedgerError>;

    /// Fetch a proof of the current value stored at `instance_id`.
    async fn get_proof(&self, instance_id: &InstanceId) -> Result<Proof, LedgerError>;

    /// Last counter the ledger accepted from `identity` (0 if none).
    async fn signer_counter(&self, identity: &IdentityRef) -> Result<u64, LedgerError>;
}
