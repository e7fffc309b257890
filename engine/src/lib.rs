use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod actor;
pub mod check;
pub mod conditions;
pub mod content;
pub mod roll;
pub mod sheet;
pub mod store;
pub mod tooltips;
mod text;

pub use actor::{Actor, ActorError, Character};
pub use check::{roll_skill, target_number, CheckError, SkillCheck};
pub use conditions::{ConditionKind, StateFlags};
pub use roll::{resolve, FeatRoll, RollResult, SkillRoll};

/// Faces on the feat die.
pub const FEAT_DIE: u8 = 12;
/// Faces on a success (skill) die.
pub const SKILL_DIE: u8 = 6;

/// Anything that can hand out uniformly distributed die faces.
///
/// Closures `FnMut(u8) -> u8` implement this, so a test can stub the dice
/// with `|_sides| 6` or a scripted sequence without touching the resolver.
pub trait DieSource {
    /// Roll one die with `sides` faces; the result is in `1..=sides`.
    fn roll(&mut self, sides: u8) -> u8;
}

impl<F> DieSource for F
where
    F: FnMut(u8) -> u8,
{
    fn roll(&mut self, sides: u8) -> u8 {
        self(sides)
    }
}

/// Seedable production dice.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    /// Build from an optional seed, falling back to OS entropy.
    pub fn seeded_or_random(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl DieSource for Dice {
    fn roll(&mut self, sides: u8) -> u8 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed list of faces, in order.
///
/// Faces are clamped into `1..=sides` so the source never breaks the
/// [`DieSource`] contract. Once the script runs dry every draw yields 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
    requests: Vec<u8>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self { faces: faces.into_iter().collect(), requests: Vec::new() }
    }

    /// Side counts of every draw made so far.
    pub fn requests(&self) -> &[u8] {
        &self.requests
    }

    /// How many draws asked for a die with `sides` faces.
    pub fn draws_of(&self, sides: u8) -> usize {
        self.requests.iter().filter(|&&s| s == sides).count()
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieSource for ScriptedDice {
    fn roll(&mut self, sides: u8) -> u8 {
        self.requests.push(sides);
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => {
                tracing::warn!(sides, "scripted dice exhausted; rolling 1");
                1
            }
        }
    }
}
