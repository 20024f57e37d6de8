//! # Rider Model
//!
//! The [`Rider`] struct is the candidate record consumed by the solver. It is
//! supplied fully validated by an external data-acquisition collaborator; the
//! solver never mutates it. Identity is the `rider_id` key alone: two records
//! with the same id are the same rider, regardless of any other field, and a
//! valid team never contains the same rider twice.
//!
//! [`Role`] is the fixed category set a rider can be picked for. The
//! `Display`/`FromStr` pair round-trips the labels used by the upstream game
//! data ("All Rounder", "Climber", "Sprinter", "Unclassed").

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::SolverError;

/// Rider category used by the roster composition rules.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    AllRounder,
    Climber,
    Sprinter,
    Unclassed,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::AllRounder => "All Rounder",
            Role::Climber => "Climber",
            Role::Sprinter => "Sprinter",
            Role::Unclassed => "Unclassed",
        };
        f.write_str(label)
    }
}

impl FromStr for Role {
    type Err = SolverError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "All Rounder" => Ok(Role::AllRounder),
            "Climber" => Ok(Role::Climber),
            "Sprinter" => Ok(Role::Sprinter),
            "Unclassed" => Ok(Role::Unclassed),
            other => Err(SolverError::UnknownRole(other.to_string())),
        }
    }
}

/// A single candidate for team membership.
///
/// `cost` is a positive integer in game credits, `points` the non-negative
/// score accumulated so far. `name` and `team` are display metadata carried
/// through to the presentation collaborator untouched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Rider {
    pub rider_id: u32,
    pub name: String,
    pub team: String,
    pub role: Role,
    pub cost: u32,
    pub points: u32,
}

impl Rider {
    /// Points scored per credit of cost, rounded up. Zero-point riders have
    /// value 0.
    pub fn value(&self) -> u32 {
        self.points.div_ceil(self.cost)
    }
}

// Identity is the rider_id key alone.
impl PartialEq for Rider {
    fn eq(&self, other: &Self) -> bool {
        self.rider_id == other.rider_id
    }
}

impl Eq for Rider {}

impl Hash for Rider {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rider_id.hash(state);
    }
}
