use serde::Serialize;
use thiserror::Error;

use crate::actor::Character;
use crate::roll::{resolve, RollResult};
use crate::{DieSource, StateFlags};

/// Attribute ratings are subtracted from this to get a target number.
pub const TN_BASE: i32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("skill '{0}' has no associated attribute")]
    NoAttribute(String),
    #[error("attribute '{attribute}' for skill '{skill}' not found")]
    UnknownAttribute { skill: String, attribute: String },
}

/// Outcome of rolling a named skill against its target number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCheck {
    pub skill: String,
    pub attribute: String,
    pub tn: i32,
    pub rating: i32,
    pub favoured: bool,
    pub advantage: i32,
    pub flags: StateFlags,
    pub roll: RollResult,
    pub passed: bool,
}

/// Target number for an attribute rating.
pub fn target_number(attribute_rating: i32) -> i32 {
    TN_BASE - attribute_rating
}

/// A roll succeeds when it meets or beats the target number.
pub fn passes(total: i32, tn: i32) -> bool {
    total >= tn
}

/// Roll one of `character`'s skills.
///
/// Conditions come from the character's state of health and the target number
/// from the skill's associated attribute.
pub fn roll_skill<D>(
    dice: &mut D,
    character: &Character,
    skill_key: &str,
    advantage: i32,
) -> Result<SkillCheck, CheckError>
where
    D: DieSource + ?Sized,
{
    let skill = character
        .skill(skill_key)
        .ok_or_else(|| CheckError::UnknownSkill(skill_key.to_string()))?;
    let attr_name = skill
        .attribute
        .as_deref()
        .ok_or_else(|| CheckError::NoAttribute(skill.key.clone()))?;
    let attribute = character.attribute(attr_name).ok_or_else(|| CheckError::UnknownAttribute {
        skill: skill.key.clone(),
        attribute: attr_name.to_string(),
    })?;

    let flags = character.state_flags();
    let tn = target_number(attribute.rating);
    let roll = resolve(dice, skill.rating, skill.favoured, &flags, advantage);
    let passed = passes(roll.total, tn);

    tracing::info!(
        character = %character.name,
        skill = %skill.key,
        tn,
        total = roll.total,
        passed,
        "skill check"
    );

    Ok(SkillCheck {
        skill: skill.name(),
        attribute: attribute.name(),
        tn,
        rating: skill.rating,
        favoured: skill.favoured,
        advantage,
        flags,
        roll,
        passed,
    })
}

impl SkillCheck {
    pub fn outcome(&self) -> &'static str {
        if self.passed {
            "SUCCESS"
        } else {
            "FAIL"
        }
    }
}
