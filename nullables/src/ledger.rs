//! Nullable ledger: a single-process ledger holding party instances,
//! access rules, credentials and signer counters in memory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pop_crypto::{blake2b_256_multi, verify_signature};
use pop_ledger::contract::{self, spawned_instance_id};
use pop_ledger::{
    credential_instance_id, AccessControlResolver, AccessRules, ClientTransaction, Credential,
    CredentialLookup, Instruction, InstructionKind, LedgerClient, LedgerError, PopPartyRecord, Proof,
    Signer, TxOutcome, ACTION_FINALIZE, CONTRACT_POP_PARTY,
};
use pop_types::{IdentityRef, InstanceId, PersonhoodKey, PublicKey};

#[derive(Clone)]
struct Instance {
    contract_id: String,
    value: Vec<u8>,
    rules_id: InstanceId,
}

#[derive(Default)]
struct LedgerState {
    instances: HashMap<InstanceId, Instance>,
    rules: HashMap<InstanceId, AccessRules>,
    identities: HashMap<IdentityRef, PublicKey>,
    /// Keyed by `credential_instance_id` of the owning identity.
    credentials: HashMap<InstanceId, Credential>,
    counters: HashMap<IdentityRef, u64>,
    submitted: Vec<ClientTransaction>,
    fail_next: Option<String>,
    wrong_proofs: bool,
    drop_state_changes: bool,
}

/// Changes one transaction makes, applied only if every instruction passes.
struct Pending<'a> {
    base: &'a LedgerState,
    instances: HashMap<InstanceId, Instance>,
    counters: HashMap<IdentityRef, u64>,
}

impl Pending<'_> {
    fn instance(&self, id: &InstanceId) -> Option<&Instance> {
        self.instances
            .get(id)
            .or_else(|| self.base.instances.get(id))
    }

    fn counter(&self, identity: &IdentityRef) -> u64 {
        self.counters
            .get(identity)
            .or_else(|| self.base.counters.get(identity))
            .copied()
            .unwrap_or(0)
    }
}

/// An in-memory ledger implementing every collaborator the party core uses.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullLedger {
    state: Mutex<LedgerState>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `signer` known to the ledger, optionally with a personhood
    /// credential.
    pub fn register_identity(&self, signer: &Signer, personhood: Option<&PersonhoodKey>) {
        let mut state = self.lock();
        let identity = signer.identity();
        state.identities.insert(identity, signer.public().clone());
        if let Some(key) = personhood {
            state.credentials.insert(
                credential_instance_id(&identity),
                Credential::default().with_personhood_key(key),
            );
        }
    }

    /// Store a credential as-is, e.g. one missing the personhood key.
    pub fn set_credential(&self, identity: IdentityRef, credential: Credential) {
        self.lock()
            .credentials
            .insert(credential_instance_id(&identity), credential);
    }

    /// Store `rules` under a fresh instance id.
    pub fn create_rules(&self, rules: AccessRules) -> InstanceId {
        let mut state = self.lock();
        let n = state.rules.len() as u64;
        let id = InstanceId::new(blake2b_256_multi(&[b"null-ledger/rules", &n.to_le_bytes()]));
        state.rules.insert(id, rules);
        id
    }

    /// Replace the rules stored at `id`.
    pub fn amend_rules(&self, id: InstanceId, rules: AccessRules) {
        self.lock().rules.insert(id, rules);
    }

    /// Every transaction received, including rejected ones.
    pub fn submitted(&self) -> Vec<ClientTransaction> {
        self.lock().submitted.clone()
    }

    /// Reject the next submission with `reason`.
    pub fn fail_next_submission(&self, reason: &str) {
        self.lock().fail_next = Some(reason.to_string());
    }

    /// Serve proofs for the wrong key.
    pub fn serve_wrong_proofs(&self, on: bool) {
        self.lock().wrong_proofs = on;
    }

    /// Accept transactions without applying them.
    pub fn drop_state_changes(&self, on: bool) {
        self.lock().drop_state_changes = on;
    }

    /// The decoded party record stored at `id`.
    pub fn party_record(&self, id: &InstanceId) -> Option<PopPartyRecord> {
        let state = self.lock();
        let instance = state.instances.get(id)?;
        PopPartyRecord::decode(&instance.value).ok()
    }

    fn apply(pending: &mut Pending<'_>, instruction: &Instruction) -> Result<(), LedgerError> {
        let base = pending.base;
        let signer = Self::check_signers(pending, instruction)?;
        let action = instruction.action();

        match &instruction.kind {
            InstructionKind::Spawn { contract_id, args } => {
                if contract_id != CONTRACT_POP_PARTY {
                    return Err(LedgerError::Rejected(format!(
                        "unknown contract {contract_id}"
                    )));
                }
                let rules_id = instruction.instance_id;
                let rules = base
                    .rules
                    .get(&rules_id)
                    .ok_or(LedgerError::UnknownRules(rules_id))?;
                let signer = signer.ok_or_else(|| LedgerError::Rejected(format!(
                    "{action} requires an identity signature"
                )))?;
                Self::check_allowed(rules, &action, &signer)?;
                let required = rules.identities(ACTION_FINALIZE).len() as u32;
                let record = contract::spawn(args, &rules_id, required)?;
                pending.instances.insert(
                    spawned_instance_id(instruction),
                    Instance {
                        contract_id: contract_id.clone(),
                        value: record.encode()?,
                        rules_id,
                    },
                );
            }
            InstructionKind::Invoke {
                contract_id,
                command,
                args,
            } => {
                let id = instruction.instance_id;
                let instance = pending
                    .instance(&id)
                    .cloned()
                    .ok_or(LedgerError::InstanceNotFound(id))?;
                if *contract_id != instance.contract_id {
                    return Err(LedgerError::Rejected(format!(
                        "instance {id} is not a {contract_id}"
                    )));
                }
                match signer {
                    Some(signer) => {
                        let rules = base
                            .rules
                            .get(&instance.rules_id)
                            .ok_or(LedgerError::UnknownRules(instance.rules_id))?;
                        Self::check_allowed(rules, &action, &signer)?;
                    }
                    None if contract::is_self_authorizing(command) => {}
                    None => {
                        return Err(LedgerError::Rejected(format!(
                            "{action} requires an identity signature"
                        )))
                    }
                }
                let record = PopPartyRecord::decode(&instance.value)?;
                let next = contract::invoke(&record, &id, command, args, signer.as_ref())?;
                pending.instances.insert(
                    id,
                    Instance {
                        value: next.encode()?,
                        ..instance
                    },
                );
            }
        }
        Ok(())
    }

    /// Verify signatures and counters, returning the signing identity.
    fn check_signers(
        pending: &mut Pending<'_>,
        instruction: &Instruction,
    ) -> Result<Option<IdentityRef>, LedgerError> {
        if instruction.is_anonymous() {
            return Ok(None);
        }
        let n = instruction.signer_identities.len();
        if instruction.signer_counters.len() != n || instruction.signatures.len() != n {
            return Err(LedgerError::Rejected(
                "signer identities, counters and signatures differ in length".into(),
            ));
        }
        let digest = instruction.digest();
        for ((identity, counter), signature) in instruction
            .signer_identities
            .iter()
            .zip(&instruction.signer_counters)
            .zip(&instruction.signatures)
        {
            let public = pending
                .base
                .identities
                .get(identity)
                .ok_or(LedgerError::InvalidSignature(*identity))?;
            if !verify_signature(&digest, signature, public) {
                return Err(LedgerError::InvalidSignature(*identity));
            }
            let expected = pending.counter(identity) + 1;
            if *counter != expected {
                return Err(LedgerError::BadCounter {
                    identity: *identity,
                    expected,
                    got: *counter,
                });
            }
            pending.counters.insert(*identity, expected);
        }
        Ok(instruction.signer_identities.first().copied())
    }

    fn check_allowed(
        rules: &AccessRules,
        action: &str,
        identity: &IdentityRef,
    ) -> Result<(), LedgerError> {
        if !rules.allows(action, identity) {
            return Err(LedgerError::Unauthorized {
                identity: *identity,
                action: action.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn submit_and_await(&self, tx: ClientTransaction) -> Result<TxOutcome, LedgerError> {
        let mut state = self.lock();
        state.submitted.push(tx.clone());
        if let Some(reason) = state.fail_next.take() {
            return Err(LedgerError::Rejected(reason));
        }

        let mut pending = Pending {
            base: &*state,
            instances: HashMap::new(),
            counters: HashMap::new(),
        };
        for instruction in &tx.instructions {
            if let Err(e) = Self::apply(&mut pending, instruction) {
                tracing::debug!(error = %e, "null ledger rejected transaction");
                return Err(e);
            }
        }
        let Pending {
            instances,
            counters,
            ..
        } = pending;

        state.counters.extend(counters);
        if !state.drop_state_changes {
            state.instances.extend(instances);
        }
        Ok(TxOutcome { tx_hash: tx.hash() })
    }

    async fn get_proof(&self, instance_id: &InstanceId) -> Result<Proof, LedgerError> {
        let state = self.lock();
        let instance = state
            .instances
            .get(instance_id)
            .ok_or(LedgerError::InstanceNotFound(*instance_id))?;
        let key = if state.wrong_proofs {
            InstanceId::new(blake2b_256_multi(&[b"wrong", instance_id.as_bytes()]))
        } else {
            *instance_id
        };
        Ok(Proof::new(
            key,
            &instance.contract_id,
            instance.value.clone(),
            instance.rules_id,
        ))
    }

    async fn signer_counter(&self, identity: &IdentityRef) -> Result<u64, LedgerError> {
        Ok(self.lock().counters.get(identity).copied().unwrap_or(0))
    }
}

#[async_trait]
impl AccessControlResolver for NullLedger {
    async fn authorized_identities(
        &self,
        rules_id: &InstanceId,
        action: &str,
    ) -> Result<Vec<IdentityRef>, LedgerError> {
        self.lock()
            .rules
            .get(rules_id)
            .map(|rules| rules.identities(action).to_vec())
            .ok_or(LedgerError::UnknownRules(*rules_id))
    }
}

#[async_trait]
impl CredentialLookup for NullLedger {
    async fn resolve_credential(
        &self,
        identity: &IdentityRef,
    ) -> Result<PersonhoodKey, LedgerError> {
        self.lock()
            .credentials
            .get(&credential_instance_id(identity))
            .and_then(Credential::personhood_key)
            .ok_or(LedgerError::MissingCredential(*identity))
    }
}
