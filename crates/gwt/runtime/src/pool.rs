//! Coalition Pool - bounded ring buffer of competing coalitions.
//!
//! Entries are kept in insertion order and tagged with a monotonically
//! increasing sequence number. Admission beyond capacity evicts from the
//! front, so the oldest-inserted coalitions go first. Coalitions that decay
//! to zero stay in the pool until winning or eviction removes them.

use std::collections::VecDeque;

use gwt_types::Coalition;
use tracing::debug;

use crate::attention::CoalitionBias;

/// A pooled coalition with its admission bookkeeping.
#[derive(Clone, Debug)]
pub struct PoolEntry {
    /// Insertion sequence number, unique within the pool's lifetime
    pub seq: u64,
    /// Cycle during which the coalition was admitted
    pub admitted_cycle: u64,
    pub coalition: Coalition,
}

/// The strongest entry found by [`CoalitionPool::strongest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leader {
    pub index: usize,
    pub strength: f64,
}

pub struct CoalitionPool {
    entries: VecDeque<PoolEntry>,
    capacity: usize,
    next_seq: u64,
}

impl CoalitionPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Append a coalition admitted during `cycle`. Returns whatever had to
    /// be evicted to stay within capacity, oldest first.
    pub fn admit(&mut self, coalition: Coalition, cycle: u64) -> Vec<Coalition> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(PoolEntry {
            seq,
            admitted_cycle: cycle,
            coalition,
        });

        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(old) = self.entries.pop_front() {
                debug!(
                    seq = old.seq,
                    content_type = %old.coalition.content_type(),
                    "Coalition evicted at capacity"
                );
                evicted.push(old.coalition);
            }
        }
        evicted
    }

    /// Pass every member through `bias`. Returns how many were boosted.
    pub fn bias_all(&mut self, bias: &dyn CoalitionBias) -> usize {
        self.entries
            .iter_mut()
            .map(|e| bias.bias(&mut e.coalition))
            .filter(|applied| *applied > 0.0)
            .count()
    }

    /// Decay every member admitted before `cycle`. Returns how many decayed.
    pub fn decay_survivors(&mut self, cycle: u64, rate: f64) -> usize {
        let mut decayed = 0;
        for entry in self.entries.iter_mut().filter(|e| e.admitted_cycle < cycle) {
            entry.coalition.decay(rate);
            decayed += 1;
        }
        decayed
    }

    /// The member with the highest competition strength. On ties the
    /// earliest-inserted member leads.
    pub fn strongest(&self) -> Option<Leader> {
        let mut leader: Option<Leader> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            let strength = entry.coalition.competition_strength();
            let better = match leader {
                None => true,
                Some(current) => strength > current.strength,
            };
            if better {
                leader = Some(Leader { index, strength });
            }
        }
        leader
    }

    /// Remove and return the member at `index`.
    pub fn take(&mut self, index: usize) -> Option<PoolEntry> {
        self.entries.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolEntry> {
        self.entries.iter()
    }

    pub fn coalitions(&self) -> impl Iterator<Item = &Coalition> {
        self.entries.iter().map(|e| &e.coalition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
