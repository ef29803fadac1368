use pop_crypto::CryptoError;
use pop_ledger::LedgerError;
use pop_types::{IdentityRef, InstanceId, PartyState, PersonhoodKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PartyError {
    #[error("cannot {operation} while party is {state}")]
    IllegalStateTransition {
        operation: &'static str,
        state: PartyState,
    },

    #[error("attendee {0} is already a candidate")]
    DuplicateAttendee(PersonhoodKey),

    #[error("attendee {0} is not a candidate")]
    UnknownAttendee(PersonhoodKey),

    #[error("ledger proof does not match party instance {0}")]
    ProofMismatch(InstanceId),

    #[error("organizer {0} has no personhood credential")]
    MissingCredential(IdentityRef),

    #[error("party is not finalized (state: {0})")]
    NotFinalized(PartyState),

    #[error("ledger submission failed: {0}")]
    LedgerSubmissionFailed(#[source] LedgerError),

    #[error("ledger state inconsistent after commit: {0}")]
    ConsistencyFault(String),

    #[error("not a valid personhood key: {0}")]
    InvalidAttendeeKey(PersonhoodKey),

    #[error("ledger error: {0}")]
    Ledger(#[source] LedgerError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("config error: {0}")]
    Config(String),
}

impl From<LedgerError> for PartyError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MissingCredential(identity) => Self::MissingCredential(identity),
            other => Self::Ledger(other),
        }
    }
}
