//! # Slot Partitioner
//!
//! This module turns a flat rider pool and a roster composition schedule into
//! *slots*: one independent choice-set per role requirement, each holding
//! every fixed-size combination of the riders eligible for that requirement.
//! The genetic solver then searches the cartesian product of the slots.
//!
//! Slots are built once, before the first generation, and are immutable for
//! the duration of a solve. Combination enumeration is lexicographic over the
//! input ordering of the pool, so a given pool always produces the same slot
//! tables; reproducible tests rely on this.
//!
//! ## Example
//!
//! ```rust
//! use rouleur::slots::{RosterRules, SlotSpec};
//!
//! // Two climbers and one pick from anywhere, 40 credits to spend.
//! let rules = RosterRules::new(
//!     vec![
//!         SlotSpec::role(rouleur::rider::Role::Climber, 2),
//!         SlotSpec::wildcard(),
//!     ],
//!     40,
//! );
//! assert_eq!(rules.slots().len(), 2);
//! ```

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::{Result, SolverError};
use crate::rider::{Rider, Role};

/// Which riders a requirement may draw from.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFilter {
    /// Only riders with the given role.
    Role(Role),
    /// Any rider in the pool, regardless of role.
    Any,
}

impl std::fmt::Display for SlotFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotFilter::Role(role) => write!(f, "{}", role),
            SlotFilter::Any => f.write_str("Any"),
        }
    }
}

/// One role requirement: a filter plus how many riders it must contribute.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub filter: SlotFilter,
    pub count: usize,
}

impl SlotSpec {
    /// A requirement of `count` riders with the given role.
    pub fn role(role: Role, count: usize) -> Self {
        Self {
            filter: SlotFilter::Role(role),
            count,
        }
    }

    /// A flexible extra pick: one rider from the full pool.
    pub fn wildcard() -> Self {
        Self {
            filter: SlotFilter::Any,
            count: 1,
        }
    }
}

/// The full composition schedule for a team, plus the cost ceiling.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRules {
    slots: Vec<SlotSpec>,
    budget: u32,
}

impl RosterRules {
    pub fn new(slots: Vec<SlotSpec>, budget: u32) -> Self {
        Self { slots, budget }
    }

    /// The standard game composition: two all-rounders, two climbers, one
    /// sprinter, three unclassed riders and a wildcard, within 100 credits.
    pub fn standard() -> Self {
        Self::new(
            vec![
                SlotSpec::role(Role::AllRounder, 2),
                SlotSpec::role(Role::Climber, 2),
                SlotSpec::role(Role::Sprinter, 1),
                SlotSpec::role(Role::Unclassed, 3),
                SlotSpec::wildcard(),
            ],
            100,
        )
    }

    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }
}

/// All eligible fixed-size combinations for one requirement.
///
/// Combinations store indices into the pool the slots were built from, in
/// lexicographic order over that pool's ordering.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub(crate) combos: Vec<Vec<usize>>,
}

impl Slot {
    pub(crate) fn len(&self) -> usize {
        self.combos.len()
    }
}

/// Builds one slot per requirement in `rules`, validating that every slot has
/// at least one combination to offer.
///
/// # Errors
///
/// - [`SolverError::EmptyPool`] if the pool has no riders at all.
/// - [`SolverError::RoleAbsent`] if a requirement names a role with no riders
///   in the pool.
/// - [`SolverError::EmptySlot`] if a requirement asks for more riders than
///   its filter matches. No valid team could ever be formed, so the solve
///   fails fast instead of looping forever.
/// - [`SolverError::Configuration`] for a requirement with a count of zero.
pub(crate) fn build_slots(pool: &[Rider], rules: &RosterRules) -> Result<Vec<Slot>> {
    if pool.is_empty() {
        return Err(SolverError::EmptyPool);
    }

    // Role-keyed grouping, built once and read-only thereafter.
    let mut by_role: HashMap<Role, Vec<usize>> = HashMap::new();
    for (idx, rider) in pool.iter().enumerate() {
        by_role.entry(rider.role).or_default().push(idx);
    }

    let everyone: Vec<usize> = (0..pool.len()).collect();

    rules
        .slots()
        .iter()
        .map(|spec| {
            if spec.count == 0 {
                return Err(SolverError::Configuration(format!(
                    "slot \"{}\" requires a positive rider count",
                    spec.filter
                )));
            }

            let eligible = match spec.filter {
                SlotFilter::Role(role) => by_role
                    .get(&role)
                    .map(Vec::as_slice)
                    .ok_or(SolverError::RoleAbsent(role))?,
                SlotFilter::Any => everyone.as_slice(),
            };

            if eligible.len() < spec.count {
                return Err(SolverError::EmptySlot {
                    filter: spec.filter.to_string(),
                    required: spec.count,
                    available: eligible.len(),
                });
            }

            let combos = eligible
                .iter()
                .copied()
                .combinations(spec.count)
                .collect::<Vec<_>>();

            Ok(Slot { combos })
        })
        .collect()
}
