//! Argument layouts for party spawn and mining instructions.

use pop_crypto::{LinkScope, LinkableSignature};
use pop_types::{IdentityRef, InstanceId, LinkageTag, PartyDescription};
use serde::{Deserialize, Serialize};

use crate::instruction::find_argument;
use crate::{Argument, ContractError, LedgerError};

pub const MINE_COMMAND: &str = "mine";
pub const BARRIER_COMMAND: &str = "barrier";
pub const FINALIZE_COMMAND: &str = "finalize";

/// Message every mining signature is made over.
pub const MINE_MESSAGE: &[u8] = b"mine";
/// Action label mining tags are bound to.
pub const MINE_ACTION: &[u8] = b"mine";

pub const ARG_ATTENDEES: &str = "attendees";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_RULES_ID: &str = "rulesID";
pub const ARG_MINING_REWARD: &str = "miningReward";
pub const ARG_LRS: &str = "lrs";
pub const ARG_TAG: &str = "tag";
pub const ARG_REWARD_TARGET: &str = "rewardTarget";

/// Link scope of mining claims for one party.
pub fn mining_scope(instance_id: &InstanceId) -> LinkScope<'_> {
    LinkScope::new(instance_id.as_bytes(), MINE_ACTION)
}

/// Where a mining reward should be credited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardTarget {
    /// An existing coin instance.
    Coin(InstanceId),
    /// A new account to be opened for this identity.
    NewAccount(IdentityRef),
}

/// Arguments of a `spawn:popParty` instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnArguments {
    pub description: PartyDescription,
    pub rules_id: InstanceId,
    pub mining_reward: u64,
}

impl SpawnArguments {
    pub fn to_arguments(&self) -> Result<Vec<Argument>, LedgerError> {
        let description =
            bincode::serialize(&self.description).map_err(|e| LedgerError::Codec(e.to_string()))?;
        Ok(vec![
            Argument::new(ARG_DESCRIPTION, description),
            Argument::new(ARG_RULES_ID, self.rules_id.as_bytes().to_vec()),
            Argument::new(ARG_MINING_REWARD, self.mining_reward.to_le_bytes().to_vec()),
        ])
    }

    pub fn from_arguments(args: &[Argument]) -> Result<Self, ContractError> {
        let description = required(args, ARG_DESCRIPTION)?;
        let description = bincode::deserialize(description).map_err(|e| {
            ContractError::InvalidArgument {
                name: ARG_DESCRIPTION,
                reason: e.to_string(),
            }
        })?;
        let rules_id = InstanceId::from_slice(required(args, ARG_RULES_ID)?).map_err(|e| {
            ContractError::InvalidArgument {
                name: ARG_RULES_ID,
                reason: e.to_string(),
            }
        })?;
        let reward: [u8; 8] = required(args, ARG_MINING_REWARD)?
            .try_into()
            .map_err(|_| ContractError::InvalidArgument {
                name: ARG_MINING_REWARD,
                reason: "expected 8 little-endian bytes".into(),
            })?;
        Ok(Self {
            description,
            rules_id,
            mining_reward: u64::from_le_bytes(reward),
        })
    }
}

/// What a miner submits: the claim and where to send the reward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiningPayload {
    pub linkage_tag: LinkageTag,
    pub signature: LinkableSignature,
    pub reward_target: RewardTarget,
}

impl MiningPayload {
    pub fn new(signature: LinkableSignature, reward_target: RewardTarget) -> Self {
        Self {
            linkage_tag: signature.tag(),
            signature,
            reward_target,
        }
    }

    pub fn to_arguments(&self) -> Result<Vec<Argument>, LedgerError> {
        let target = bincode::serialize(&self.reward_target)
            .map_err(|e| LedgerError::Codec(e.to_string()))?;
        Ok(vec![
            Argument::new(ARG_TAG, self.linkage_tag.as_bytes().to_vec()),
            Argument::new(ARG_LRS, self.signature.to_bytes()),
            Argument::new(ARG_REWARD_TARGET, target),
        ])
    }

    /// Parse and check that the declared tag is the one inside the signature.
    pub fn from_arguments(args: &[Argument]) -> Result<Self, ContractError> {
        let tag: [u8; 32] = required(args, ARG_TAG)?.try_into().map_err(|_| {
            ContractError::InvalidArgument {
                name: ARG_TAG,
                reason: "expected 32 bytes".into(),
            }
        })?;
        let signature = LinkableSignature::from_bytes(required(args, ARG_LRS)?).map_err(|e| {
            ContractError::InvalidArgument {
                name: ARG_LRS,
                reason: e.to_string(),
            }
        })?;
        let reward_target = bincode::deserialize(required(args, ARG_REWARD_TARGET)?).map_err(
            |e| ContractError::InvalidArgument {
                name: ARG_REWARD_TARGET,
                reason: e.to_string(),
            },
        )?;
        if signature.tag() != LinkageTag(tag) {
            return Err(ContractError::InvalidArgument {
                name: ARG_TAG,
                reason: "does not match the signature's linkage tag".into(),
            });
        }
        Ok(Self {
            linkage_tag: LinkageTag(tag),
            signature,
            reward_target,
        })
    }
}

pub(crate) fn required<'a>(
    args: &'a [Argument],
    name: &'static str,
) -> Result<&'a [u8], ContractError> {
    find_argument(args, name).ok_or(ContractError::MissingArgument(name))
}
