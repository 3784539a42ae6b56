//! Exhaustive damage tables over the 52-card universe.
//!
//! Two mask-keyed tables cover every nonempty subset of at most 5 card
//! identities (~2.89M entries):
//!
//! - the attack table stores each subset's combo kind and damage,
//! - the best-attack table stores the maximum damage over all nonempty
//!   sub-selections of the subset, capturing that playing fewer,
//!   better-matching cards can beat playing everything.
//!
//! Critical flags never enter the tables; their multiplier applies at lookup
//! time to the actual play.

use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use super::actions::for_each_combination;
use super::store::TableStore;
use crate::cards::{subset_mask, Card, DECK_SIZE};
use crate::combo::{classify, ComboKind};

/// Artifact name for the attack table.
pub const ATTACK_TABLE_FILE: &str = "attack_table.bin";

/// Artifact name for the best-attack table.
pub const BEST_ATTACK_TABLE_FILE: &str = "best_attack_table.bin";

/// Damage bonus per critical card in a play.
const CRITICAL_BONUS: f64 = 0.25;

/// Read-only damage lookups, built once per process and shared by all tasks.
#[derive(Clone, Debug)]
pub struct ComboTables {
    attack: FxHashMap<u64, (ComboKind, u32)>,
    best: FxHashMap<u64, u32>,
}

impl ComboTables {
    /// Build both tables by exhaustive enumeration.
    ///
    /// The best-attack table is filled size-upward: every proper subset of X
    /// is reachable from X by dropping one card, so
    /// `best(X) = max(attack(X), max over c in X of best(X without c))`.
    #[must_use]
    pub fn build() -> Self {
        let start = Instant::now();
        let mut attack = FxHashMap::default();
        let mut best = FxHashMap::default();
        let mut cards = Vec::with_capacity(5);

        for r in 1..=5 {
            for_each_combination(DECK_SIZE, r, |ids| {
                cards.clear();
                cards.extend(ids.iter().map(|&id| Card::from_id(id, false)));
                let mask = subset_mask(&cards);

                let combo = classify(&cards);
                attack.insert(mask, (combo.kind, combo.total()));

                let mut best_damage = combo.total();
                for &id in ids {
                    let sub = mask & !(1u64 << id);
                    if sub != 0 {
                        best_damage = best_damage.max(best[&sub]);
                    }
                }
                best.insert(mask, best_damage);
            });
        }

        info!(
            entries = attack.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built attack and best-attack tables"
        );
        Self { attack, best }
    }

    /// Load the tables from `dir`, or rebuild and write them back.
    ///
    /// Unreadable artifacts trigger a rebuild; unwritable storage degrades to
    /// in-memory operation for this process. Neither is an error.
    #[must_use]
    pub fn load_or_build(dir: &Path) -> Self {
        let store = TableStore::new(dir);

        match (store.load(ATTACK_TABLE_FILE), store.load(BEST_ATTACK_TABLE_FILE)) {
            (Ok(attack), Ok(best)) => {
                let tables = Self { attack, best };
                info!(dir = %dir.display(), entries = tables.len(), "loaded precomputed tables");
                return tables;
            }
            (Err(e), _) | (_, Err(e)) => {
                info!(dir = %dir.display(), reason = %e, "precomputed tables unavailable, rebuilding");
            }
        }

        let tables = Self::build();
        if let Err(e) = store
            .save(ATTACK_TABLE_FILE, &tables.attack)
            .and_then(|()| store.save(BEST_ATTACK_TABLE_FILE, &tables.best))
        {
            warn!(dir = %dir.display(), error = %e, "could not persist tables, continuing in memory");
        }
        tables
    }

    /// Number of subset entries (identical for both tables).
    #[must_use]
    pub fn len(&self) -> usize {
        self.attack.len()
    }

    /// Whether the tables are empty (never the case after a build).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attack.is_empty()
    }

    /// Combo kind and critical-blind damage for playing exactly this subset.
    #[must_use]
    pub fn attack_combo(&self, cards: &[Card]) -> Option<(ComboKind, u32)> {
        self.attack.get(&subset_mask(cards)).copied()
    }

    /// Critical-blind best damage for the exact mask of a play.
    ///
    /// # Panics
    ///
    /// Panics if `mask` is not a nonempty subset of at most 5 identities.
    /// Such a mask can only come from a malformed action; returning a silent
    /// zero would let it skew the search instead of surfacing the bug.
    #[must_use]
    pub fn best_raw(&self, mask: u64) -> u32 {
        match self.best.get(&mask) {
            Some(&damage) => damage,
            None => panic!("mask {mask:#x} outside the 1..=5-card universe"),
        }
    }

    /// Damage dealt by playing `cards`: the best sub-selection value for the
    /// play's identity mask, scaled by 25% per critical card in the play.
    #[must_use]
    pub fn best_attack_damage(&self, cards: &[Card]) -> f64 {
        let base = self.best_raw(subset_mask(cards));
        let criticals = cards.iter().filter(|c| c.critical).count();
        f64::from(base) * (1.0 + CRITICAL_BONUS * criticals as f64)
    }
}
