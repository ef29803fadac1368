//! Instructions and client transactions submitted to the ledger.

use pop_crypto::{blake2b_256, blake2b_256_multi};
use pop_types::{IdentityRef, InstanceId, Signature};
use serde::{Deserialize, Serialize};

/// A named opaque argument carried by an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Vec<u8>,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// What an instruction asks the target instance to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Create a new instance of `contract_id`, authorised by the target rules.
    Spawn {
        contract_id: String,
        args: Vec<Argument>,
    },
    /// Run `command` on an existing instance.
    Invoke {
        contract_id: String,
        command: String,
        args: Vec<Argument>,
    },
}

/// One instruction, optionally authorised by identity signatures.
///
/// An instruction with no signer identities is anonymous; the ledger only
/// accepts it for commands the contract declares self-authorising.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub instance_id: InstanceId,
    pub kind: InstructionKind,
    pub signer_identities: Vec<IdentityRef>,
    pub signer_counters: Vec<u64>,
    pub signatures: Vec<Signature>,
}

impl Instruction {
    pub fn spawn(target: InstanceId, contract_id: &str, args: Vec<Argument>) -> Self {
        Self::unsigned(
            target,
            InstructionKind::Spawn {
                contract_id: contract_id.to_string(),
                args,
            },
        )
    }

    pub fn invoke(
        instance_id: InstanceId,
        contract_id: &str,
        command: &str,
        args: Vec<Argument>,
    ) -> Self {
        Self::unsigned(
            instance_id,
            InstructionKind::Invoke {
                contract_id: contract_id.to_string(),
                command: command.to_string(),
                args,
            },
        )
    }

    fn unsigned(instance_id: InstanceId, kind: InstructionKind) -> Self {
        Self {
            instance_id,
            kind,
            signer_identities: Vec::new(),
            signer_counters: Vec::new(),
            signatures: Vec::new(),
        }
    }

    pub fn contract_id(&self) -> &str {
        match &self.kind {
            InstructionKind::Spawn { contract_id, .. }
            | InstructionKind::Invoke { contract_id, .. } => contract_id,
        }
    }

    pub fn args(&self) -> &[Argument] {
        match &self.kind {
            InstructionKind::Spawn { args, .. } | InstructionKind::Invoke { args, .. } => args,
        }
    }

    /// Value of the first argument called `name`.
    pub fn argument(&self, name: &str) -> Option<&[u8]> {
        find_argument(self.args(), name)
    }

    /// The access-rule action this instruction needs, e.g. `invoke:finalize`.
    pub fn action(&self) -> String {
        match &self.kind {
            InstructionKind::Spawn { contract_id, .. } => format!("spawn:{contract_id}"),
            InstructionKind::Invoke { command, .. } => format!("invoke:{command}"),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.signer_identities.is_empty()
    }

    /// Digest signed by identities: everything except the signatures.
    pub fn digest(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        buf.extend_from_slice(self.instance_id.as_bytes());
        match &self.kind {
            InstructionKind::Spawn { contract_id, args } => {
                buf.push(0);
                put(&mut buf, contract_id.as_bytes());
                put_args(&mut buf, args);
            }
            InstructionKind::Invoke {
                contract_id,
                command,
                args,
            } => {
                buf.push(1);
                put(&mut buf, contract_id.as_bytes());
                put(&mut buf, command.as_bytes());
                put_args(&mut buf, args);
            }
        }
        buf.extend_from_slice(&(self.signer_identities.len() as u64).to_le_bytes());
        for identity in &self.signer_identities {
            buf.extend_from_slice(identity.as_bytes());
        }
        buf.extend_from_slice(&(self.signer_counters.len() as u64).to_le_bytes());
        for counter in &self.signer_counters {
            buf.extend_from_slice(&counter.to_le_bytes());
        }
        blake2b_256(&buf)
    }

    /// Id of an instance created by this instruction.
    pub fn derive_id(&self, label: &str) -> InstanceId {
        InstanceId::new(blake2b_256_multi(&[&self.digest(), label.as_bytes()]))
    }
}

pub(crate) fn find_argument<'a>(args: &'a [Argument], name: &str) -> Option<&'a [u8]> {
    args.iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_slice())
}

fn put(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}

fn put_args(buf: &mut Vec<u8>, args: &[Argument]) {
    buf.extend_from_slice(&(args.len() as u64).to_le_bytes());
    for arg in args {
        put(buf, arg.name.as_bytes());
        put(buf, &arg.value);
    }
}

/// A batch of instructions applied atomically by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTransaction {
    pub instructions: Vec<Instruction>,
}

impl ClientTransaction {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn hash(&self) -> [u8; 32] {
        let digests: Vec<[u8; 32]> = self.instructions.iter().map(Instruction::digest).collect();
        let parts: Vec<&[u8]> = digests.iter().map(|d| d.as_slice()).collect();
        blake2b_256_multi(&parts)
    }
}

/// Result of a transaction the ledger included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: [u8; 32],
}
