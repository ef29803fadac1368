//! Ledger-side rules for party instances.
//!
//! A ledger integration runs these after it has checked instruction
//! signatures, counters, and access rules. Each function takes the current
//! record and returns the next one; the caller stores it only if the whole
//! transaction succeeds.

use pop_crypto::{is_valid_personhood_key, verify};
use pop_types::{IdentityRef, InstanceId, PartyState};

use crate::payload::{
    required, MiningPayload, SpawnArguments, ARG_ATTENDEES, ARG_RULES_ID, BARRIER_COMMAND,
    FINALIZE_COMMAND, MINE_COMMAND, MINE_MESSAGE,
};
use crate::{mining_scope, Argument, Attendees, ContractError, Instruction, PopPartyRecord};

pub const CONTRACT_POP_PARTY: &str = "popParty";

/// Id of the party created by a signed spawn instruction.
pub fn spawned_instance_id(instruction: &Instruction) -> InstanceId {
    instruction.derive_id(CONTRACT_POP_PARTY)
}

/// Commands accepted without an identity signature: the instruction's own
/// payload is the authorisation.
pub fn is_self_authorizing(command: &str) -> bool {
    command == MINE_COMMAND
}

/// Create the record of a new party.
///
/// `rules_id` is the access-rules instance the spawn instruction targets; the
/// `rulesID` argument must name the same instance. `required_finalizations`
/// is the number of identities those rules authorise to finalize.
pub fn spawn(
    args: &[Argument],
    rules_id: &InstanceId,
    required_finalizations: u32,
) -> Result<PopPartyRecord, ContractError> {
    if required_finalizations == 0 {
        return Err(ContractError::NoOrganizers);
    }
    let spawn = SpawnArguments::from_arguments(args)?;
    if spawn.rules_id != *rules_id {
        return Err(ContractError::InvalidArgument {
            name: ARG_RULES_ID,
            reason: format!("names {} but the instruction targets {rules_id}", spawn.rules_id),
        });
    }
    Ok(PopPartyRecord::new(
        spawn.description,
        required_finalizations,
        spawn.mining_reward,
    ))
}

/// Apply `command` to `record`.
pub fn invoke(
    record: &PopPartyRecord,
    instance_id: &InstanceId,
    command: &str,
    args: &[Argument],
    signer: Option<&IdentityRef>,
) -> Result<PopPartyRecord, ContractError> {
    match command {
        BARRIER_COMMAND => barrier(record),
        FINALIZE_COMMAND => {
            let signer = signer.ok_or_else(|| ContractError::MissingSigner(command.into()))?;
            finalize(record, args, signer)
        }
        MINE_COMMAND => mine(record, instance_id, args),
        other => Err(ContractError::UnknownCommand(other.to_string())),
    }
}

fn expect_state(
    record: &PopPartyRecord,
    command: &str,
    state: PartyState,
) -> Result<(), ContractError> {
    if record.state != state {
        return Err(ContractError::InvalidState {
            command: command.to_string(),
            state: record.state,
        });
    }
    Ok(())
}

fn barrier(record: &PopPartyRecord) -> Result<PopPartyRecord, ContractError> {
    expect_state(record, BARRIER_COMMAND, PartyState::PreBarrier)?;
    let mut next = record.clone();
    next.state = PartyState::Scanning;
    Ok(next)
}

fn finalize(
    record: &PopPartyRecord,
    args: &[Argument],
    signer: &IdentityRef,
) -> Result<PopPartyRecord, ContractError> {
    expect_state(record, FINALIZE_COMMAND, PartyState::Scanning)?;
    let roster = Attendees::from_bytes(required(args, ARG_ATTENDEES)?).map_err(|e| {
        ContractError::InvalidArgument {
            name: ARG_ATTENDEES,
            reason: e.to_string(),
        }
    })?;
    if roster.is_empty() {
        return Err(ContractError::EmptyRoster);
    }
    if !roster.is_canonical() {
        return Err(ContractError::NonCanonicalRoster);
    }
    if let Some(bad) = roster.keys().iter().find(|k| !is_valid_personhood_key(k)) {
        return Err(ContractError::InvalidAttendeeKey(*bad));
    }

    let mut next = record.clone();
    let resubmission = next.finalizations.contains(signer);
    if next.finalizations.is_empty() || resubmission || next.proposed != roster {
        if !next.finalizations.is_empty() {
            tracing::debug!(
                organizer = %signer,
                resubmission,
                "resetting proposed roster"
            );
        }
        next.proposed = roster;
        next.finalizations = vec![*signer];
    } else {
        next.finalizations.push(*signer);
    }

    if next.finalizations.len() >= next.required_finalizations as usize {
        next.attendees = std::mem::take(&mut next.proposed);
        next.state = PartyState::Finalized;
        tracing::info!(
            party = %next.description.name,
            attendees = next.attendees.len(),
            "party finalized"
        );
    }
    Ok(next)
}

fn mine(
    record: &PopPartyRecord,
    instance_id: &InstanceId,
    args: &[Argument],
) -> Result<PopPartyRecord, ContractError> {
    expect_state(record, MINE_COMMAND, PartyState::Finalized)?;
    let payload = MiningPayload::from_arguments(args)?;
    if !verify(
        MINE_MESSAGE,
        &payload.signature,
        record.attendees.keys(),
        mining_scope(instance_id),
    ) {
        return Err(ContractError::InvalidRingSignature);
    }
    if record.has_mined(&payload.linkage_tag) {
        return Err(ContractError::AlreadyMined(payload.linkage_tag));
    }
    let mut next = record.clone();
    next.miners.push(payload.linkage_tag);
    Ok(next)
}
