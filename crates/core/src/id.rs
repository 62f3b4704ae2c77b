//! Time-ordered unique identifiers.
//!
//! Ids follow the snowflake layout packed into a positive `i64`:
//!
//! ```text
//! | 1 bit unused | 41 bits millis since EPOCH | 5 bits cluster | 5 bits node | 12 bits sequence |
//! ```
//!
//! A generator is created once at startup and shared through application
//! state. Ids from one generator are strictly increasing.

use crate::error::{Error, Result};
use std::sync::Mutex;
use time::OffsetDateTime;

/// Custom epoch (2024-01-01T00:00:00Z) in unix milliseconds.
pub const EPOCH_MILLIS: i64 = 1_704_067_200_000;

const CLUSTER_BITS: u32 = 5;
const NODE_BITS: u32 = 5;
const SEQUENCE_BITS: u32 = 12;

/// Largest cluster id accepted by the generator.
pub const MAX_CLUSTER_ID: u8 = (1 << CLUSTER_BITS) - 1;
/// Largest node id accepted by the generator.
pub const MAX_NODE_ID: u8 = (1 << NODE_BITS) - 1;

const MAX_SEQUENCE: i64 = (1 << SEQUENCE_BITS) - 1;
const NODE_SHIFT: u32 = SEQUENCE_BITS;
const CLUSTER_SHIFT: u32 = SEQUENCE_BITS + NODE_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + NODE_BITS + CLUSTER_BITS;

#[derive(Debug)]
struct GeneratorState {
    last_millis: i64,
    sequence: i64,
}

/// Snowflake id generator.
#[derive(Debug)]
pub struct IdGenerator {
    cluster_id: u8,
    node_id: u8,
    state: Mutex<GeneratorState>,
}

/// Fields unpacked from a generated id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdParts {
    pub timestamp_millis: i64,
    pub cluster_id: u8,
    pub node_id: u8,
    pub sequence: u16,
}

impl IdGenerator {
    /// Create a generator for the given cluster and node.
    pub fn new(cluster_id: u8, node_id: u8) -> Result<Self> {
        if cluster_id > MAX_CLUSTER_ID {
            return Err(Error::IdGenerator(format!(
                "cluster_id {cluster_id} exceeds {MAX_CLUSTER_ID}"
            )));
        }
        if node_id > MAX_NODE_ID {
            return Err(Error::IdGenerator(format!(
                "node_id {node_id} exceeds {MAX_NODE_ID}"
            )));
        }
        Ok(Self {
            cluster_id,
            node_id,
            state: Mutex::new(GeneratorState {
                last_millis: 0,
                sequence: 0,
            }),
        })
    }

    /// Generate the next id.
    pub fn generate(&self) -> i64 {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut now = current_millis();
        // Clock went backwards: keep issuing from the last timestamp.
        if now < state.last_millis {
            now = state.last_millis;
        }

        if now == state.last_millis {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            // Sequence exhausted for this millisecond.
            if state.sequence == 0 {
                while now <= state.last_millis {
                    std::hint::spin_loop();
                    now = current_millis();
                }
            }
        } else {
            state.sequence = 0;
        }

        state.last_millis = now;

        ((now - EPOCH_MILLIS) << TIMESTAMP_SHIFT)
            | (i64::from(self.cluster_id) << CLUSTER_SHIFT)
            | (i64::from(self.node_id) << NODE_SHIFT)
            | state.sequence
    }

    /// Split an id back into its components.
    pub fn parse(id: i64) -> IdParts {
        IdParts {
            timestamp_millis: (id >> TIMESTAMP_SHIFT) + EPOCH_MILLIS,
            cluster_id: ((id >> CLUSTER_SHIFT) & i64::from(MAX_CLUSTER_ID)) as u8,
            node_id: ((id >> NODE_SHIFT) & i64::from(MAX_NODE_ID)) as u8,
            sequence: (id & MAX_SEQUENCE) as u16,
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            cluster_id: 0,
            node_id: 0,
            state: Mutex::new(GeneratorState {
                last_millis: 0,
                sequence: 0,
            }),
        }
    }
}

fn current_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_rejects_out_of_range_ids() {
        assert!(IdGenerator::new(MAX_CLUSTER_ID + 1, 0).is_err());
        assert!(IdGenerator::new(0, MAX_NODE_ID + 1).is_err());
        assert!(IdGenerator::new(MAX_CLUSTER_ID, MAX_NODE_ID).is_ok());
    }

    #[test]
    fn test_ids_are_positive_and_increasing() {
        let generator = IdGenerator::new(1, 2).unwrap();
        let mut last = 0;
        for _ in 0..10_000 {
            let id = generator.generate();
            assert!(id > 0);
            assert!(id > last, "{id} should be greater than {last}");
            last = id;
        }
    }

    #[test]
    fn test_parse_roundtrip_fields() {
        let generator = IdGenerator::new(3, 17).unwrap();
        let before = current_millis();
        let id = generator.generate();
        let after = current_millis();

        let parts = IdGenerator::parse(id);
        assert_eq!(parts.cluster_id, 3);
        assert_eq!(parts.node_id, 17);
        assert!(parts.timestamp_millis >= before && parts.timestamp_millis <= after);
    }

    #[test]
    fn test_unique_across_threads() {
        let generator = Arc::new(IdGenerator::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || {
                    (0..2_000).map(|_| generator.generate()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 8_000);
    }
}
