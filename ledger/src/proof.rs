//! Inclusion proofs returned by the ledger for an instance.

use pop_crypto::blake2b_256;
use pop_types::InstanceId;
use serde::{Deserialize, Serialize};

/// The ledger's answer to "what is stored at this instance id".
///
/// The collaborator that fetches a proof is responsible for checking it
/// against the ledger's signed state root; what reaches the party core is
/// the key, the stored value, and a digest binding the two.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    key: InstanceId,
    contract_id: String,
    value: Vec<u8>,
    rules_id: InstanceId,
    value_digest: [u8; 32],
}

impl Proof {
    pub fn new(key: InstanceId, contract_id: &str, value: Vec<u8>, rules_id: InstanceId) -> Self {
        let value_digest = blake2b_256(&value);
        Self {
            key,
            contract_id: contract_id.to_string(),
            value,
            rules_id,
            value_digest,
        }
    }

    /// Whether this proof is for `instance_id` and its value is intact.
    pub fn matches(&self, instance_id: &InstanceId) -> bool {
        self.key == *instance_id && blake2b_256(&self.value) == self.value_digest
    }

    /// The stored record bytes.
    pub fn decode(&self) -> &[u8] {
        &self.value
    }

    pub fn key(&self) -> &InstanceId {
        &self.key
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Access rules governing the instance.
    pub fn rules_id(&self) -> &InstanceId {
        &self.rules_id
    }
}
