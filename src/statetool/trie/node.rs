use crate::error::{Result, StatetoolError};
use crate::hexutil::hex_lower;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const NIBBLES_PER_BYTE: usize = 2;
pub const BRANCH_WIDTH: usize = 16;

/// Split each byte into its high and low nibble.
pub fn to_nibbles(key: &[u8]) -> Vec<u8> {
    let mut nibbles = Vec::with_capacity(key.len() * NIBBLES_PER_BYTE);
    for byte in key {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0f);
    }
    nibbles
}

pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Lowercase hex SHA-256 of a serialized node.
pub type NodeHash = String;

pub type Children = [Option<NodeHash>; BRANCH_WIDTH];

/// A trie node. Both variants carry the nibbles of the key that lead from
/// the parent's child slot to this node (`partial`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        partial: Vec<u8>,
        value: Vec<u8>,
    },
    Branch {
        partial: Vec<u8>,
        children: Children,
        value: Option<Vec<u8>>,
    },
}

impl Node {
    pub fn leaf(partial: &[u8], value: Vec<u8>) -> Self {
        Node::Leaf {
            partial: partial.to_vec(),
            value,
        }
    }

    pub fn empty_branch(partial: &[u8]) -> Self {
        Node::Branch {
            partial: partial.to_vec(),
            children: Children::default(),
            value: None,
        }
    }

    pub fn partial(&self) -> &[u8] {
        match self {
            Node::Leaf { partial, .. } | Node::Branch { partial, .. } => partial,
        }
    }

    pub fn with_partial(self, new_partial: Vec<u8>) -> Self {
        match self {
            Node::Leaf { value, .. } => Node::Leaf {
                partial: new_partial,
                value,
            },
            Node::Branch {
                children, value, ..
            } => Node::Branch {
                partial: new_partial,
                children,
                value,
            },
        }
    }

    pub fn encode(&self) -> Result<(NodeHash, Vec<u8>)> {
        let bytes = serde_json::to_vec(self)?;
        let hash = hex_lower(Sha256::digest(&bytes));
        Ok((hash, bytes))
    }

    pub fn decode(hash: &str, bytes: &[u8]) -> Result<Self> {
        let node: Node = serde_json::from_slice(bytes).map_err(|e| StatetoolError::CorruptNode {
            hash: hash.to_string(),
            reason: e.to_string(),
        })?;
        if node.partial().iter().any(|n| *n as usize >= BRANCH_WIDTH) {
            return Err(StatetoolError::CorruptNode {
                hash: hash.to_string(),
                reason: "partial key contains a value that is not a nibble".to_string(),
            });
        }
        Ok(node)
    }
}
