//! The external collaborators a party handle talks to.

use std::sync::Arc;

use pop_ledger::{
    AccessControlResolver, CounterSigner, CredentialLookup, LedgerClient, TransactionSigner,
};

/// Handles to the ledger-facing collaborators.
#[derive(Clone)]
pub struct PartyServices {
    pub ledger: Arc<dyn LedgerClient>,
    pub access: Arc<dyn AccessControlResolver>,
    pub credentials: Arc<dyn CredentialLookup>,
    pub signer: Arc<dyn TransactionSigner>,
}

impl PartyServices {
    /// Use one backend for every lookup, with a [`CounterSigner`] on top.
    pub fn from_ledger<L>(ledger: Arc<L>) -> Self
    where
        L: LedgerClient + AccessControlResolver + CredentialLookup + 'static,
    {
        Self {
            ledger: ledger.clone(),
            access: ledger.clone(),
            credentials: ledger.clone(),
            signer: Arc::new(CounterSigner::new(ledger)),
        }
    }
}
