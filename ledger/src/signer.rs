//! Identity signing of instructions.

use async_trait::async_trait;
use pop_crypto::{identity_of, keypair_from_seed, sign_message};
use pop_types::{IdentityRef, KeyPair, PublicKey, Signature};
use std::sync::Arc;

use crate::{Instruction, LedgerClient, LedgerError};

/// A private identity able to authorise instructions.
pub struct Signer {
    identity: IdentityRef,
    keypair: KeyPair,
}

impl Signer {
    pub fn new(keypair: KeyPair) -> Self {
        Self {
            identity: identity_of(&keypair.public),
            keypair,
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::new(keypair_from_seed(seed))
    }

    pub fn identity(&self) -> IdentityRef {
        self.identity
    }

    pub fn public(&self) -> &PublicKey {
        &self.keypair.public
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        sign_message(message, &self.keypair.private)
    }
}

/// Supplies per-instruction authorisation and per-identity counters.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Stamp `instructions` with `signer`'s identity, fresh counters, and
    /// signatures over each instruction digest.
    async fn authorize(
        &self,
        signer: &Signer,
        instructions: &mut [Instruction],
    ) -> Result<(), LedgerError>;
}

/// Signs with counters continuing from the last one the ledger accepted.
pub struct CounterSigner {
    ledger: Arc<dyn LedgerClient>,
}

impl CounterSigner {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl TransactionSigner for CounterSigner {
    async fn authorize(
        &self,
        signer: &Signer,
        instructions: &mut [Instruction],
    ) -> Result<(), LedgerError> {
        let identity = signer.identity();
        let mut counter = self.ledger.signer_counter(&identity).await?;
        for instruction in instructions.iter_mut() {
            counter += 1;
            instruction.signer_identities = vec![identity];
            instruction.signer_counters = vec![counter];
            instruction.signatures.clear();
            let signature = signer.sign(&instruction.digest());
            instruction.signatures.push(signature);
        }
        tracing::trace!(identity = %identity, last_counter = counter, "authorised instructions");
        Ok(())
    }
}
