//! Replica sequencing.
//!
//! The dispatch engine consumes a lazy sequence of candidate endpoints and
//! pulls only as many as the concurrency budget needs. How candidates are
//! ranked is a sequencer concern; the engine works the same whether the
//! sequence is empty, finite, or infinite.

use std::collections::VecDeque;
use std::sync::Mutex;

use repliq_common::Request;

/// Produces the candidate replica sequence for one call.
///
/// The returned iterator must be lazy: the engine pulls the next candidate
/// only when its budget allows another attempt. Yielding a replica more than
/// once is legal and is how per-replica retry policy is expressed.
pub trait ReplicaSequencer: Send + Sync {
    fn sequence(&self, request: &Request) -> Box<dyn Iterator<Item = String> + Send>;
}

/// Round-robin sequencer over a managed replica list.
///
/// Each call yields one full pass over the current replicas, starting at the
/// rotation point, then advances the rotation so consecutive calls spread
/// load across the cluster.
pub struct RoundRobinSequencer {
    replicas: Mutex<VecDeque<String>>,
}

impl RoundRobinSequencer {
    /// Create a new sequencer with a static replica list
    pub fn new(replicas: Vec<String>) -> Self {
        Self {
            replicas: Mutex::new(VecDeque::from(replicas)),
        }
    }

    /// Add a replica to the pool
    pub fn add_replica(&self, replica: String) {
        let mut replicas = self.replicas.lock().expect("replica list poisoned");
        if !replicas.contains(&replica) {
            replicas.push_back(replica);
        }
    }

    /// Remove a replica from the pool
    pub fn remove_replica(&self, replica: &str) {
        let mut replicas = self.replicas.lock().expect("replica list poisoned");
        replicas.retain(|r| r != replica);
    }

    /// Get the number of replicas
    pub fn replica_count(&self) -> usize {
        self.replicas.lock().expect("replica list poisoned").len()
    }

    /// Get list of all replicas in current rotation order
    pub fn replicas(&self) -> Vec<String> {
        self.replicas
            .lock()
            .expect("replica list poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

impl ReplicaSequencer for RoundRobinSequencer {
    fn sequence(&self, _request: &Request) -> Box<dyn Iterator<Item = String> + Send> {
        let mut replicas = self.replicas.lock().expect("replica list poisoned");

        // Snapshot one pass, then rotate: move first to back.
        let pass: Vec<String> = replicas.iter().cloned().collect();
        if let Some(first) = replicas.pop_front() {
            replicas.push_back(first);
        }

        Box::new(pass.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(sequencer: &RoundRobinSequencer) -> Vec<String> {
        sequencer.sequence(&Request::get("foo")).collect()
    }

    #[test]
    fn test_sequencer_creation() {
        let sequencer = RoundRobinSequencer::new(vec![
            "localhost:9001".to_string(),
            "localhost:9002".to_string(),
        ]);
        assert_eq!(sequencer.replica_count(), 2);
    }

    #[test]
    fn test_round_robin_rotation() {
        let sequencer = RoundRobinSequencer::new(vec![
            "replica1".to_string(),
            "replica2".to_string(),
            "replica3".to_string(),
        ]);

        assert_eq!(collect(&sequencer), vec!["replica1", "replica2", "replica3"]);
        assert_eq!(collect(&sequencer), vec!["replica2", "replica3", "replica1"]);
        assert_eq!(collect(&sequencer), vec!["replica3", "replica1", "replica2"]);
        // wraps around
        assert_eq!(collect(&sequencer), vec!["replica1", "replica2", "replica3"]);
    }

    #[test]
    fn test_empty_replicas_yield_nothing() {
        let sequencer = RoundRobinSequencer::new(vec![]);
        assert!(collect(&sequencer).is_empty());
    }

    #[test]
    fn test_single_replica() {
        let sequencer = RoundRobinSequencer::new(vec!["only-replica".to_string()]);
        assert_eq!(collect(&sequencer), vec!["only-replica"]);
        assert_eq!(collect(&sequencer), vec!["only-replica"]);
    }

    #[test]
    fn test_add_replica() {
        let sequencer = RoundRobinSequencer::new(vec!["replica1".to_string()]);
        sequencer.add_replica("replica2".to_string());
        assert_eq!(sequencer.replica_count(), 2);
    }

    #[test]
    fn test_add_duplicate_replica() {
        let sequencer = RoundRobinSequencer::new(vec!["replica1".to_string()]);
        sequencer.add_replica("replica1".to_string());
        // duplicate
        assert_eq!(sequencer.replica_count(), 1);
    }

    #[test]
    fn test_remove_replica() {
        let sequencer = RoundRobinSequencer::new(vec![
            "replica1".to_string(),
            "replica2".to_string(),
            "replica3".to_string(),
        ]);
        sequencer.remove_replica("replica2");
        assert_eq!(sequencer.replica_count(), 2);
        assert_eq!(
            sequencer.replicas(),
            vec!["replica1".to_string(), "replica3".to_string()]
        );
    }

    #[test]
    fn test_sequence_is_a_snapshot() {
        let sequencer = RoundRobinSequencer::new(vec!["replica1".to_string()]);
        let pass = sequencer.sequence(&Request::get("foo"));
        sequencer.remove_replica("replica1");
        // An already-produced pass is unaffected by later management calls.
        assert_eq!(pass.collect::<Vec<_>>(), vec!["replica1"]);
    }
}
