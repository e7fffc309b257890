//! Skill roll resolution: one feat die (best of two when favoured) plus a
//! pool of success dice.

use serde::{Deserialize, Serialize};

use crate::{DieSource, StateFlags, FEAT_DIE, SKILL_DIE};

/// Feat die face that counts as an automatic 10.
pub const GANDALF_RUNE: u8 = 12;
/// Feat die face that counts as -1 (or 0 while miserable).
pub const EYE_OF_SAURON: u8 = 11;

/// Largest success pool ever rolled; bigger ratings plus advantage are cut
/// down to this.
pub const MAX_POOL: usize = 100;

const GANDALF_RUNE_VALUE: i32 = 10;
/// Highest success die face a weary hero loses.
const WEARY_MAX_FACE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatRoll {
    /// Every feat face drawn, in draw order.
    pub rolled: Vec<u8>,
    pub kept: u8,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRoll {
    /// Faces as rolled; weariness changes the total, not the faces.
    pub kept: Vec<u8>,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    /// Kept feat die first, then every success die.
    pub kept_dice: Vec<u8>,
    pub total: i32,
    #[serde(rename = "featDetail")]
    pub feat: FeatRoll,
    #[serde(rename = "skillDetail")]
    pub skill: SkillRoll,
}

/// Number of success dice after advantage, in `0..=MAX_POOL`.
pub fn skill_pool(rating: i32, advantage: i32) -> usize {
    usize::try_from(rating.saturating_add(advantage))
        .unwrap_or(0)
        .min(MAX_POOL)
}

/// Value a kept feat face contributes to the total.
pub fn feat_value(face: u8, miserable: bool) -> i32 {
    match face {
        GANDALF_RUNE => GANDALF_RUNE_VALUE,
        EYE_OF_SAURON if miserable => 0,
        EYE_OF_SAURON => -1,
        n => i32::from(n),
    }
}

/// Value a success die contributes to the total.
pub fn skill_value(face: u8, weary: bool) -> i32 {
    if weary && face <= WEARY_MAX_FACE {
        0
    } else {
        i32::from(face)
    }
}

/// Resolve a skill roll.
///
/// Draws one feat die (two when `favoured`, keeping the higher) and then
/// `max(0, rating + advantage)` success dice (at most [`MAX_POOL`]), all from
/// `dice`. Feat dice are always drawn before success dice.
pub fn resolve<D>(
    dice: &mut D,
    rating: i32,
    favoured: bool,
    flags: &StateFlags,
    advantage: i32,
) -> RollResult
where
    D: DieSource + ?Sized,
{
    let feat_count = if favoured { 2 } else { 1 };
    let rolled: Vec<u8> = (0..feat_count).map(|_| dice.roll(FEAT_DIE)).collect();
    let kept = rolled.iter().copied().max().unwrap_or(1);
    let feat = FeatRoll { total: feat_value(kept, flags.is_miserable()), rolled, kept };

    let pool = skill_pool(rating, advantage);
    let faces: Vec<u8> = (0..pool).map(|_| dice.roll(SKILL_DIE)).collect();
    let skill_total = faces
        .iter()
        .map(|&f| skill_value(f, flags.is_weary()))
        .fold(0i32, i32::saturating_add);
    let skill = SkillRoll { kept: faces, total: skill_total };

    let mut kept_dice = Vec::with_capacity(1 + skill.kept.len());
    kept_dice.push(feat.kept);
    kept_dice.extend_from_slice(&skill.kept);

    let total = feat.total.saturating_add(skill.total);
    tracing::debug!(
        rating,
        advantage,
        favoured,
        %flags,
        feat = ?feat.rolled,
        skill = ?skill.kept,
        total,
        "resolved skill roll"
    );

    RollResult { kept_dice, total, feat, skill }
}

impl RollResult {
    /// Did the feat die come up as the Gandalf rune?
    pub fn is_gandalf(&self) -> bool {
        self.feat.kept == GANDALF_RUNE
    }

    pub fn is_eye(&self) -> bool {
        self.feat.kept == EYE_OF_SAURON
    }
}
