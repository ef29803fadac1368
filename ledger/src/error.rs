use pop_types::{IdentityRef, InstanceId, LinkageTag, PartyState, PersonhoodKey};
use thiserror::Error;

/// Failures reported by ledger collaborators.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("contract refused instruction: {0}")]
    Contract(#[from] ContractError),

    #[error("instance {0} not found")]
    InstanceNotFound(InstanceId),

    #[error("access rules {0} not found")]
    UnknownRules(InstanceId),

    #[error("identity {0} has no personhood credential")]
    MissingCredential(IdentityRef),

    #[error("identity {identity} is not authorised for {action}")]
    Unauthorized {
        identity: IdentityRef,
        action: String,
    },

    #[error("identity {identity} used counter {got}, expected {expected}")]
    BadCounter {
        identity: IdentityRef,
        expected: u64,
        got: u64,
    },

    #[error("invalid instruction signature from {0}")]
    InvalidSignature(IdentityRef),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Reasons the party contract refuses an instruction.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("cannot {command} while party is {state}")]
    InvalidState { command: String, state: PartyState },

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("attendee roster is not strictly ascending")]
    NonCanonicalRoster,

    #[error("attendee roster is empty")]
    EmptyRoster,

    #[error("{0} requires an identity signature")]
    MissingSigner(String),

    #[error("roster entry {0} is not a valid personhood key")]
    InvalidAttendeeKey(PersonhoodKey),

    #[error("no identity is authorised to finalize")]
    NoOrganizers,

    #[error("linkable ring signature does not verify against the roster")]
    InvalidRingSignature,

    #[error("linkage tag {0} has already mined")]
    AlreadyMined(LinkageTag),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
