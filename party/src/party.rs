//! The party state machine.
//!
//! Every mutating call follows the same shape: check the local state, build
//! and submit a ledger transaction, then reload the record from a fresh
//! proof. Nothing is written to the handle until the reload succeeded, so a
//! failed call leaves the handle exactly as it was.

use pop_crypto::is_valid_personhood_key;
use pop_ledger::contract::spawned_instance_id;
use pop_ledger::payload::{ARG_ATTENDEES, BARRIER_COMMAND, FINALIZE_COMMAND, MINE_COMMAND};
use pop_ledger::{
    Argument, Attendees, ClientTransaction, Instruction, PopPartyRecord, RewardTarget, Signer,
    SpawnArguments, TxOutcome, ACTION_FINALIZE, CONTRACT_POP_PARTY,
};
use pop_types::{
    IdentityRef, InstanceId, LinkageTag, PartyDescription, PartyState, PersonhoodKey,
    PersonhoodSecret,
};

use crate::mining::{mining_payload, mining_tag};
use crate::{CandidateSet, FinalStatement, PartyConfig, PartyError, PartyServices};

/// What one proof fetch tells us about the party.
struct Snapshot {
    record: PopPartyRecord,
    rules_id: InstanceId,
    organizers: Vec<IdentityRef>,
}

/// A client-side handle on one party instance.
///
/// Mutating methods take `&mut self`; callers sharing a party across tasks
/// serialise access per handle or hold one handle per actor.
pub struct PopParty {
    services: PartyServices,
    instance_id: InstanceId,
    rules_id: InstanceId,
    record: PopPartyRecord,
    organizers: Vec<IdentityRef>,
    candidates: CandidateSet,
}

impl PopParty {
    /// Create a new party governed by `rules_id`, signed by `organizer`.
    pub async fn spawn(
        services: PartyServices,
        organizer: &Signer,
        rules_id: InstanceId,
        description: PartyDescription,
        mining_reward: u64,
    ) -> Result<Self, PartyError> {
        let args = SpawnArguments {
            description,
            rules_id,
            mining_reward,
        }
        .to_arguments()?;
        let mut instruction = Instruction::spawn(rules_id, CONTRACT_POP_PARTY, args);
        services
            .signer
            .authorize(organizer, std::slice::from_mut(&mut instruction))
            .await
            .map_err(PartyError::LedgerSubmissionFailed)?;
        let instance_id = spawned_instance_id(&instruction);

        tracing::debug!(instance = %instance_id, rules = %rules_id, "spawning party");
        submit(&services, instruction).await?;

        let party = Self::from_ledger(services, instance_id).await?;
        if party.state() != PartyState::PreBarrier {
            return Err(PartyError::ConsistencyFault(format!(
                "new party {instance_id} reads back as {}",
                party.state()
            )));
        }
        tracing::info!(instance = %instance_id, "party spawned");
        Ok(party)
    }

    /// Attach to an existing party instance.
    pub async fn from_ledger(
        services: PartyServices,
        instance_id: InstanceId,
    ) -> Result<Self, PartyError> {
        let snapshot = load(&services, &instance_id).await?;
        let candidates = if snapshot.record.state == PartyState::Scanning {
            seed_candidates(&services, &snapshot.organizers).await?
        } else {
            CandidateSet::new()
        };
        Ok(Self {
            services,
            instance_id,
            rules_id: snapshot.rules_id,
            record: snapshot.record,
            organizers: snapshot.organizers,
            candidates,
        })
    }

    /// Attach to the instance named in `config`.
    pub async fn open(services: PartyServices, config: &PartyConfig) -> Result<Self, PartyError> {
        let instance_id = config
            .instance_id()?
            .ok_or_else(|| PartyError::Config("no instance_id configured".into()))?;
        Self::from_ledger(services, instance_id).await
    }

    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    pub fn rules_id(&self) -> &InstanceId {
        &self.rules_id
    }

    pub fn state(&self) -> PartyState {
        self.record.state
    }

    pub fn description(&self) -> &PartyDescription {
        &self.record.description
    }

    pub fn mining_reward(&self) -> u64 {
        self.record.mining_reward
    }

    /// Final roster; empty until the party is finalized.
    pub fn attendees(&self) -> &Attendees {
        &self.record.attendees
    }

    /// Identities currently authorised to finalize.
    pub fn organizers(&self) -> &[IdentityRef] {
        &self.organizers
    }

    /// Organizers whose finalization is recorded for the pending roster.
    pub fn pending_finalizations(&self) -> &[IdentityRef] {
        &self.record.finalizations
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Pass the barrier point: PreBarrier to Scanning.
    pub async fn activate_barrier(&mut self, organizer: &Signer) -> Result<(), PartyError> {
        self.require(PartyState::PreBarrier, "activate barrier")?;
        self.submit_signed(organizer, BARRIER_COMMAND, Vec::new())
            .await?;

        let snapshot = load(&self.services, &self.instance_id).await?;
        if snapshot.record.state != PartyState::Scanning {
            return Err(self.fault(PartyState::Scanning, snapshot.record.state));
        }
        self.install(snapshot).await?;
        tracing::info!(instance = %self.instance_id, "barrier activated");
        Ok(())
    }

    pub fn add_attendee(&mut self, key: PersonhoodKey) -> Result<(), PartyError> {
        self.require(PartyState::Scanning, "add attendee")?;
        if !is_valid_personhood_key(&key) {
            return Err(PartyError::InvalidAttendeeKey(key));
        }
        self.candidates.add(key)
    }

    pub fn remove_attendee(&mut self, key: &PersonhoodKey) -> Result<(), PartyError> {
        self.require(PartyState::Scanning, "remove attendee")?;
        self.candidates.remove(key)
    }

    /// Submit the canonical roster of the current candidates.
    ///
    /// Returns `Finalized` once enough organizers agreed, or `Scanning` when
    /// this organizer's finalization is recorded and co-organizers are still
    /// missing.
    pub async fn finalize(&mut self, organizer: &Signer) -> Result<PartyState, PartyError> {
        self.require(PartyState::Scanning, "finalize")?;
        let roster = self.candidates.to_roster();
        tracing::debug!(
            instance = %self.instance_id,
            attendees = roster.len(),
            "finalizing roster"
        );
        self.submit_signed(
            organizer,
            FINALIZE_COMMAND,
            vec![Argument::new(ARG_ATTENDEES, roster.to_bytes())],
        )
        .await?;

        let snapshot = load(&self.services, &self.instance_id).await?;
        let record = &snapshot.record;
        let state = match record.state {
            PartyState::Finalized => PartyState::Finalized,
            PartyState::Scanning
                if record.proposed == roster
                    && record.finalizations.contains(&organizer.identity()) =>
            {
                tracing::warn!(
                    instance = %self.instance_id,
                    signed = record.finalizations.len(),
                    required = record.required_finalizations,
                    "finalization recorded, waiting for co-organizers"
                );
                PartyState::Scanning
            }
            found => return Err(self.fault(PartyState::Finalized, found)),
        };
        self.install(snapshot).await?;
        if state == PartyState::Finalized {
            tracing::info!(
                instance = %self.instance_id,
                attendees = self.record.attendees.len(),
                "party finalized"
            );
        }
        Ok(state)
    }

    /// Reload everything from the ledger.
    pub async fn refresh(&mut self) -> Result<(), PartyError> {
        let snapshot = load(&self.services, &self.instance_id).await?;
        self.install(snapshot).await
    }

    pub fn final_statement(&self) -> Result<FinalStatement, PartyError> {
        if self.record.state != PartyState::Finalized {
            return Err(PartyError::NotFinalized(self.record.state));
        }
        Ok(FinalStatement {
            description: self.record.description.clone(),
            attendees: self.record.attendees.clone(),
        })
    }

    /// Claim the mining reward anonymously as one of the attendees.
    ///
    /// The instruction carries no identity signature; the ring signature over
    /// the roster authorises it. Returns the linkage tag now recorded.
    pub async fn mine(
        &mut self,
        secret: &PersonhoodSecret,
        reward_target: RewardTarget,
    ) -> Result<LinkageTag, PartyError> {
        if self.record.state != PartyState::Finalized {
            return Err(PartyError::NotFinalized(self.record.state));
        }
        let payload = mining_payload(
            &self.instance_id,
            &self.record.attendees,
            secret,
            reward_target,
        )?;
        let tag = payload.linkage_tag;
        let instruction = Instruction::invoke(
            self.instance_id,
            CONTRACT_POP_PARTY,
            MINE_COMMAND,
            payload.to_arguments()?,
        );
        tracing::debug!(instance = %self.instance_id, tag = %tag, "submitting mining claim");
        submit(&self.services, instruction).await?;

        let snapshot = load(&self.services, &self.instance_id).await?;
        if !snapshot.record.has_mined(&tag) {
            return Err(PartyError::ConsistencyFault(format!(
                "mining tag {tag} missing from party {} after commit",
                self.instance_id
            )));
        }
        self.install(snapshot).await?;
        tracing::info!(instance = %self.instance_id, tag = %tag, "mined");
        Ok(tag)
    }

    /// Whether `secret` has already mined this party.
    pub fn has_mined(&self, secret: &PersonhoodSecret) -> Result<bool, PartyError> {
        let tag = mining_tag(&self.instance_id, secret)?;
        Ok(self.record.has_mined(&tag))
    }

    fn require(&self, state: PartyState, operation: &'static str) -> Result<(), PartyError> {
        if self.record.state != state {
            return Err(PartyError::IllegalStateTransition {
                operation,
                state: self.record.state,
            });
        }
        Ok(())
    }

    fn fault(&self, expected: PartyState, found: PartyState) -> PartyError {
        tracing::warn!(
            instance = %self.instance_id,
            expected = %expected,
            found = %found,
            "ledger read-back disagrees with committed transaction"
        );
        PartyError::ConsistencyFault(format!(
            "party {} reads back as {found}, expected {expected}",
            self.instance_id
        ))
    }

    /// Replace the handle's fields from `snapshot`.
    ///
    /// Seeds the candidates with the organizers' keys on the first
    /// observation of `Scanning`. Fails without touching the handle.
    async fn install(&mut self, snapshot: Snapshot) -> Result<(), PartyError> {
        let seeded = match snapshot.record.state {
            PartyState::Scanning if self.candidates.is_empty() => {
                Some(seed_candidates(&self.services, &snapshot.organizers).await?)
            }
            _ => None,
        };
        if snapshot.record.state != PartyState::Scanning {
            self.candidates.clear();
        }
        if let Some(candidates) = seeded {
            self.candidates = candidates;
        }
        self.rules_id = snapshot.rules_id;
        self.organizers = snapshot.organizers;
        self.record = snapshot.record;
        Ok(())
    }

    async fn submit_signed(
        &self,
        organizer: &Signer,
        command: &str,
        args: Vec<Argument>,
    ) -> Result<TxOutcome, PartyError> {
        let mut instruction =
            Instruction::invoke(self.instance_id, CONTRACT_POP_PARTY, command, args);
        self.services
            .signer
            .authorize(organizer, std::slice::from_mut(&mut instruction))
            .await
            .map_err(PartyError::LedgerSubmissionFailed)?;
        tracing::debug!(
            instance = %self.instance_id,
            command,
            organizer = %organizer.identity(),
            "submitting instruction"
        );
        submit(&self.services, instruction).await
    }
}

async fn submit(
    services: &PartyServices,
    instruction: Instruction,
) -> Result<TxOutcome, PartyError> {
    services
        .ledger
        .submit_and_await(ClientTransaction::new(vec![instruction]))
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "ledger rejected transaction");
            PartyError::LedgerSubmissionFailed(e)
        })
}

async fn load(services: &PartyServices, instance_id: &InstanceId) -> Result<Snapshot, PartyError> {
    let proof = services.ledger.get_proof(instance_id).await?;
    if !proof.matches(instance_id) || proof.contract_id() != CONTRACT_POP_PARTY {
        tracing::warn!(instance = %instance_id, "proof does not match party instance");
        return Err(PartyError::ProofMismatch(*instance_id));
    }
    let record = PopPartyRecord::decode(proof.decode())?;
    let rules_id = *proof.rules_id();
    let organizers = services
        .access
        .authorized_identities(&rules_id, ACTION_FINALIZE)
        .await?;
    tracing::trace!(
        instance = %instance_id,
        state = %record.state,
        organizers = organizers.len(),
        "loaded party snapshot"
    );
    Ok(Snapshot {
        record,
        rules_id,
        organizers,
    })
}

async fn seed_candidates(
    services: &PartyServices,
    organizers: &[IdentityRef],
) -> Result<CandidateSet, PartyError> {
    let mut candidates = CandidateSet::new();
    for identity in organizers {
        let key = services.credentials.resolve_credential(identity).await?;
        if !is_valid_personhood_key(&key) {
            return Err(PartyError::InvalidAttendeeKey(key));
        }
        // Organizers sharing a key are one attendee.
        let _ = candidates.add(key);
    }
    Ok(candidates)
}
