//! Access rules, credentials, and the collaborators that resolve them.
//!
//! Rules are a typed map from action to the identities allowed to perform it,
//! so organizer resolution is a lookup rather than expression parsing.

use async_trait::async_trait;
use pop_crypto::blake2b_256_multi;
use pop_types::{IdentityRef, InstanceId, PersonhoodKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::LedgerError;

pub const ACTION_SPAWN_PARTY: &str = "spawn:popParty";
pub const ACTION_BARRIER: &str = "invoke:barrier";
pub const ACTION_FINALIZE: &str = "invoke:finalize";

const CREDENTIAL_DOMAIN: &[u8] = b"credential";
const PERSONHOOD_GROUP: &str = "personhood";
const PERSONHOOD_ATTRIBUTE: &str = "ed25519";

/// Which identities may perform which action on the instances they govern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    rules: BTreeMap<String, Vec<IdentityRef>>,
}

impl AccessRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, action: &str, identities: Vec<IdentityRef>) -> Self {
        self.set_rule(action, identities);
        self
    }

    pub fn set_rule(&mut self, action: &str, identities: Vec<IdentityRef>) {
        self.rules.insert(action.to_string(), identities);
    }

    pub fn identities(&self, action: &str) -> &[IdentityRef] {
        self.rules.get(action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn allows(&self, action: &str, identity: &IdentityRef) -> bool {
        self.identities(action).contains(identity)
    }
}

/// A named attribute within a credential group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialAttribute {
    pub name: String,
    pub value: Vec<u8>,
}

/// A named group of attributes, e.g. `personhood`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialGroup {
    pub name: String,
    pub attributes: Vec<CredentialAttribute>,
}

/// Generic key-value credential record attached to an identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub groups: Vec<CredentialGroup>,
}

impl Credential {
    pub fn attribute(&self, group: &str, name: &str) -> Option<&[u8]> {
        self.groups
            .iter()
            .filter(|g| g.name == group)
            .flat_map(|g| g.attributes.iter())
            .find(|a| a.name == name)
            .map(|a| a.value.as_slice())
    }

    /// Insert or overwrite `group`/`name`.
    pub fn set_attribute(&mut self, group: &str, name: &str, value: Vec<u8>) {
        let idx = match self.groups.iter().position(|g| g.name == group) {
            Some(idx) => idx,
            None => {
                self.groups.push(CredentialGroup {
                    name: group.to_string(),
                    attributes: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let attributes = &mut self.groups[idx].attributes;
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => attributes.push(CredentialAttribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn with_personhood_key(mut self, key: &PersonhoodKey) -> Self {
        self.set_attribute(PERSONHOOD_GROUP, PERSONHOOD_ATTRIBUTE, key.0.to_vec());
        self
    }

    /// The personhood public key, if present and 32 bytes long.
    pub fn personhood_key(&self) -> Option<PersonhoodKey> {
        let bytes = self.attribute(PERSONHOOD_GROUP, PERSONHOOD_ATTRIBUTE)?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(PersonhoodKey(arr))
    }
}

/// Where the credential of `identity` is stored.
pub fn credential_instance_id(identity: &IdentityRef) -> InstanceId {
    InstanceId::new(blake2b_256_multi(&[CREDENTIAL_DOMAIN, identity.as_bytes()]))
}

/// Resolves the identities authorised for an action under a set of rules.
#[async_trait]
pub trait AccessControlResolver: Send + Sync {
    async fn authorized_identities(
        &self,
        rules_id: &InstanceId,
        action: &str,
    ) -> Result<Vec<IdentityRef>, LedgerError>;
}

/// Resolves an identity to the personhood key in its credential.
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    /// Fails with [`LedgerError::MissingCredential`] if the identity has no
    /// credential or the credential lacks a personhood key.
    async fn resolve_credential(&self, identity: &IdentityRef)
        -> Result<PersonhoodKey, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_lookup() {
        let org = IdentityRef::new([1; 32]);
        let rules = AccessRules::new().with_rule(ACTION_FINALIZE, vec![org]);
        assert!(rules.allows(ACTION_FINALIZE, &org));
        assert!(!rules.allows(ACTION_BARRIER, &org));
        assert!(rules.identities("invoke:unknown").is_empty());
    }

    #[test]
    fn personhood_attribute_roundtrip() {
        let key = PersonhoodKey([9; 32]);
        let cred = Credential::default().with_personhood_key(&key);
        assert_eq!(cred.personhood_key(), Some(key));
    }

    #[test]
    fn set_attribute_overwrites() {
        let mut cred = Credential::default();
        cred.set_attribute("personhood", "ed25519", vec![1; 32]);
        cred.set_attribute("personhood", "ed25519", vec![2; 32]);
        cred.set_attribute("contact", "email", b"org@example.org".to_vec());
        assert_eq!(cred.groups.len(), 2);
        assert_eq!(cred.personhood_key(), Some(PersonhoodKey([2; 32])));
    }

    #[test]
    fn short_personhood_attribute_is_ignored() {
        let mut cred = Credential::default();
        cred.set_attribute("personhood", "ed25519", vec![1; 16]);
        assert_eq!(cred.personhood_key(), None);
    }

    #[test]
    fn credential_ids_are_per_identity() {
        let a = credential_instance_id(&IdentityRef::new([1; 32]));
        let b = credential_instance_id(&IdentityRef::new([2; 32]));
        assert_ne!(a, b);
    }
}
