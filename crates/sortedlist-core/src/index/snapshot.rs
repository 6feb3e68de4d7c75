use crate::{
    config::IndexConfig,
    error::InternalError,
    index::{Node, SortedLinkedIndex},
    obs::MetricsEvent,
    serialize::{deserialize_bounded, serialize},
    types::NodeId,
};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

///
/// IndexSnapshot
///
/// Persisted state layout of one index: the record table plus counters.
/// Chain ends are not stored; restore derives them from the records.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexSnapshot {
    pub next_id: NodeId,
    pub size: u64,
    pub nodes: Vec<Node>,
}

impl IndexSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, InternalError> {
        Ok(serialize(self)?)
    }

    pub fn decode(bytes: &[u8], max_bytes: usize) -> Result<Self, InternalError> {
        Ok(deserialize_bounded(bytes, max_bytes)?)
    }
}

impl SortedLinkedIndex {
    #[must_use]
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            next_id: self.next_id,
            size: self.size,
            nodes: self.nodes.clone(),
        }
    }

    /// Rebuild an index from a snapshot, rejecting any that breaks the
    /// table or chain invariants.
    pub fn restore(snapshot: IndexSnapshot, config: IndexConfig) -> Result<Self, InternalError> {
        config.validate()?;

        let IndexSnapshot {
            next_id,
            size,
            nodes,
        } = snapshot;
        let end = |at_end: fn(&Node) -> NodeId| {
            nodes
                .iter()
                .find(|node| node.exists() && at_end(node).is_head())
                .map_or(NodeId::HEAD, Node::id)
        };
        let first = end(Node::left);
        let last = end(Node::right);

        let index = Self {
            nodes,
            next_id,
            size,
            first,
            last,
            config,
            sink: None,
        };

        if let Err(err) = index.check_invariants() {
            warn!(error = %err, "snapshot rejected");

            return Err(InternalError::snapshot_corruption(format!(
                "snapshot rejected: {}",
                err.message
            )));
        }

        info!(
            nodes = index.nodes.len(),
            size = index.size,
            next_id = %index.next_id,
            "index restored from snapshot"
        );
        index.record(MetricsEvent::Restore {
            nodes: u64::try_from(index.nodes.len()).unwrap_or(u64::MAX),
        });

        Ok(index)
    }

    /// Decode CBOR snapshot bytes (bounded by `config.max_snapshot_bytes`)
    /// and restore from them.
    pub fn restore_from_bytes(bytes: &[u8], config: IndexConfig) -> Result<Self, InternalError> {
        let snapshot = IndexSnapshot::decode(bytes, config.max_snapshot_bytes)?;

        Self::restore(snapshot, config)
    }
}
