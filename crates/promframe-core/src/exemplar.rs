//! Bounded exemplar sampling
//!
//! Exemplar queries can return far more points than a panel can draw. The
//! sampler groups points into time buckets of `step` width and keeps at most
//! `capacity` points per bucket using reservoir sampling (Algorithm R), so
//! every point seen in a bucket has the same chance of being retained and
//! memory stays bounded regardless of input size.
//!
//! Output is deterministic for a fixed seed: buckets are visited in
//! ascending key order and each reservoir yields points in slot order.

use chrono::{DateTime, Utc};
use promframe_domain::LabelSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// A sampled trace point
#[derive(Debug, Clone, PartialEq)]
pub struct Exemplar {
    /// Sample time
    pub timestamp: DateTime<Utc>,
    /// Sample value
    pub value: f64,
    /// Series labels merged with the exemplar's own labels
    pub labels: LabelSet,
}

#[derive(Debug)]
struct Reservoir {
    slots: Vec<Exemplar>,
    seen: u64,
}

/// Per-bucket reservoir sampler for one decode pass
#[derive(Debug)]
pub struct ExemplarSampler {
    step_millis: i64,
    capacity: usize,
    rng: StdRng,
    buckets: BTreeMap<i64, Reservoir>,
    label_names: BTreeSet<String>,
}

impl ExemplarSampler {
    /// Create a sampler.
    ///
    /// A zero `step` puts every point into one bucket. `capacity` is clamped
    /// to at least one slot.
    pub fn new(step: Duration, capacity: usize, seed: u64) -> Self {
        Self {
            step_millis: i64::try_from(step.as_millis()).unwrap_or(i64::MAX),
            capacity: capacity.max(1),
            rng: StdRng::seed_from_u64(seed),
            buckets: BTreeMap::new(),
            label_names: BTreeSet::new(),
        }
    }

    fn bucket_key(&self, ts: &DateTime<Utc>) -> i64 {
        if self.step_millis <= 0 {
            return 0;
        }
        ts.timestamp_millis().div_euclid(self.step_millis)
    }

    /// Offer one point to its bucket's reservoir
    pub fn update(&mut self, exemplar: Exemplar) {
        self.label_names
            .extend(exemplar.labels.names().map(str::to_owned));

        let key = self.bucket_key(&exemplar.timestamp);
        let capacity = self.capacity;
        let reservoir = self.buckets.entry(key).or_insert_with(|| Reservoir {
            slots: Vec::with_capacity(capacity.min(16)),
            seen: 0,
        });
        reservoir.seen += 1;

        if reservoir.slots.len() < capacity {
            reservoir.slots.push(exemplar);
            return;
        }

        let slot = self.rng.random_range(0..reservoir.seen);
        if let Ok(slot) = usize::try_from(slot) {
            if slot < capacity {
                reservoir.slots[slot] = exemplar;
            }
        }
    }

    /// Number of points currently retained
    pub fn len(&self) -> usize {
        self.buckets.values().map(|r| r.slots.len()).sum()
    }

    /// Check if nothing was sampled
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(|r| r.slots.is_empty())
    }

    /// Union of label names over every offered point, sorted
    pub fn label_names(&self) -> Vec<String> {
        self.label_names.iter().cloned().collect()
    }

    /// Retained points ordered by bucket, then by reservoir slot
    pub fn into_exemplars(self) -> Vec<Exemplar> {
        self.buckets
            .into_values()
            .flat_map(|reservoir| reservoir.slots)
            .collect()
    }
}
