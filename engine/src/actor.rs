//! Typed actor records.
//!
//! Foundry-style exports nest most values as `{ "value": ... }` and leave
//! plenty of fields out. Everything is parsed once here into plain structs so
//! the sheet and the roller never go probing through raw JSON. Missing or null
//! fields fall back to zero/empty and odd flag shapes read as unset; numbers
//! that are present must be integers.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::conditions::{ConditionKind, StateFlags};
use crate::sheet::parse_label;

/// `type` tag that selects the character schema.
pub const CHARACTER_TYPE: &str = "character";

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("actor record is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("actor record must be a JSON object")]
    NotAnObject,
    #[error("invalid character record '{name}': {source}")]
    Character {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    Character(Box<Character>),
    /// Any other actor type; kept as raw JSON for the generic editor.
    Generic(GenericActor),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericActor {
    pub name: String,
    pub kind: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    pub name: String,
    /// `prototypeToken.texture.src`, relative to the image folder.
    pub portrait: Option<String>,
    pub biography: Biography,
    pub conditions: StateFlags,
    pub resources: Resources,
    /// Attributes keyed as in the record, in record order.
    pub attributes: IndexMap<String, Attribute>,
    pub skills: IndexMap<String, Skill>,
    pub combat: Combat,
    pub treasure: Option<String>,
    pub features: Option<String>,
    pub flaws: Option<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Biography {
    pub culture: Option<String>,
    pub cultural_blessing: Option<String>,
    pub calling: Option<String>,
    pub standard_of_living: Option<String>,
    pub patron: Option<String>,
    pub shadow_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pool {
    pub value: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resources {
    pub endurance: Pool,
    pub hope: Pool,
    pub shadow: i32,
    pub shadow_scars: i32,
    pub travel_load: i32,
    pub fatigue: Option<String>,
    pub protection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    /// Raw label, e.g. `tor2e.attributes.heart`; the key when absent.
    pub label: String,
    pub rating: i32,
}

impl Attribute {
    pub fn name(&self) -> String {
        parse_label(&self.label)
    }

    fn answers_to(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
            || parse_label(&self.key).eq_ignore_ascii_case(name)
            || parse_label(&self.label).eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub key: String,
    pub label: Option<String>,
    pub rating: i32,
    pub favoured: bool,
    /// Lower-case attribute name from `roll.associatedAttribute`.
    pub attribute: Option<String>,
}

impl Skill {
    /// Display name: the short label, or the bare key.
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) => parse_label(label),
            None => self.key.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Combat {
    pub parry: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub qualities: Option<String>,
}

impl Actor {
    /// Parse JSON text into a typed actor.
    pub fn from_json_str(text: &str) -> Result<Self, ActorError> {
        let value = serde_json::from_str(text).map_err(ActorError::Json)?;
        Self::from_value(value)
    }

    /// Classify a record by its `type` and validate it.
    pub fn from_value(value: Value) -> Result<Self, ActorError> {
        let obj = value.as_object().ok_or(ActorError::NotAnObject)?;
        let name = obj.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
        let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default().to_string();

        if kind == CHARACTER_TYPE {
            let raw: RawCharacter = serde_json::from_value(value)
                .map_err(|source| ActorError::Character { name: name.clone(), source })?;
            Ok(Actor::Character(Box::new(raw.into())))
        } else {
            Ok(Actor::Generic(GenericActor { name, kind, data: value }))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Actor::Character(c) => &c.name,
            Actor::Generic(g) => &g.name,
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Actor::Character(c) => Some(&**c),
            Actor::Generic(_) => None,
        }
    }
}

impl Character {
    pub fn state_flags(&self) -> StateFlags {
        self.conditions.clone()
    }

    /// Find a skill by key, falling back to a case-insensitive match on key
    /// or display name.
    pub fn skill(&self, key: &str) -> Option<&Skill> {
        self.skills.get(key).or_else(|| {
            self.skills
                .values()
                .find(|s| s.key.eq_ignore_ascii_case(key) || s.name().eq_ignore_ascii_case(key))
        })
    }

    /// Find an attribute by key or by the last segment of its label.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.values().find(|a| a.answers_to(name))
    }

    /// Items whose `type` matches any of `kinds`, in record order.
    pub fn items_of<'a>(&'a self, kinds: &'a [&'a str]) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |i| kinds.contains(&i.kind.as_str()))
    }
}

/* ---------------- raw record shapes ---------------- */

type Loose = Option<Value>;

/// Render a loosely typed display field. `{ "value": x }` wrappers are
/// unwrapped, empty strings and nulls count as absent.
fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("value").and_then(loose_text),
        Value::Array(items) => {
            let parts: Vec<_> = items.iter().filter_map(loose_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
    }
}

fn text(value: &Loose) -> Option<String> {
    value.as_ref().and_then(loose_text)
}

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct Field<T> {
    #[serde(default, deserialize_with = "nullable")]
    value: T,
}

/// A checkbox. Accepts `true`, `{ "value": true }`, `"true"` and non-zero
/// numbers; anything else reads as unset.
#[derive(Debug, Default, Clone, Copy)]
struct RawFlag(bool);

fn flag_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Object(map) => map.get("value").is_some_and(flag_value),
        Value::Null | Value::Array(_) => false,
    }
}

impl<'de> Deserialize<'de> for RawFlag {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        Value::deserialize(de).map(|v| RawFlag(flag_value(&v)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCharacter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    prototype_token: Option<RawToken>,
    #[serde(default, deserialize_with = "nullable")]
    system: RawSystem,
    #[serde(default, deserialize_with = "nullable")]
    items: Vec<RawItem>,
}

#[derive(Debug, Default, Deserialize)]
struct RawToken {
    #[serde(default)]
    texture: Option<RawTexture>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTexture {
    #[serde(default)]
    src: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSystem {
    #[serde(deserialize_with = "nullable")]
    biography: RawBiography,
    #[serde(deserialize_with = "nullable")]
    state_of_health: RawHealth,
    #[serde(deserialize_with = "nullable")]
    resources: RawResources,
    #[serde(deserialize_with = "nullable")]
    attributes: IndexMap<String, RawAttribute>,
    #[serde(deserialize_with = "nullable")]
    common_skills: RawSkills,
    #[serde(deserialize_with = "nullable")]
    combat_attributes: RawCombat,
    treasure: Loose,
    features: Loose,
    flaws: Loose,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawBiography {
    culture: Loose,
    cultural_blessing: Loose,
    calling: Loose,
    standard_of_living: Loose,
    patron: Loose,
    shadow_path: Loose,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHealth {
    miserable: RawFlag,
    weary: RawFlag,
    wounded: RawFlag,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawResources {
    #[serde(deserialize_with = "nullable")]
    endurance: RawPool,
    #[serde(deserialize_with = "nullable")]
    hope: RawPool,
    #[serde(deserialize_with = "nullable")]
    shadow: RawShadow,
    #[serde(deserialize_with = "nullable")]
    travel_load: Field<i32>,
    fatigue: Loose,
    protection: Loose,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPool {
    #[serde(deserialize_with = "nullable")]
    value: i32,
    #[serde(deserialize_with = "nullable")]
    max: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawShadow {
    #[serde(deserialize_with = "nullable")]
    temporary: Field<i32>,
    #[serde(deserialize_with = "nullable")]
    shadow_scars: Field<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAttribute {
    label: Option<String>,
    #[serde(deserialize_with = "nullable")]
    value: i32,
}

#[derive(Debug)]
enum RawSkills {
    Map(IndexMap<String, RawSkill>),
    List(Vec<RawSkill>),
}

impl<'de> Deserialize<'de> for RawSkills {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        match Value::deserialize(de)? {
            Value::Null => Ok(RawSkills::default()),
            map @ Value::Object(_) => serde_json::from_value(map)
                .map(RawSkills::Map)
                .map_err(D::Error::custom),
            list @ Value::Array(_) => serde_json::from_value(list)
                .map(RawSkills::List)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "skills must be a map or a list, found {}",
                other
            ))),
        }
    }
}

impl Default for RawSkills {
    fn default() -> Self {
        RawSkills::Map(IndexMap::new())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSkill {
    skill_key: Option<String>,
    label: Option<String>,
    #[serde(deserialize_with = "nullable")]
    value: i32,
    favoured: RawFlag,
    roll: Option<RawSkillRoll>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSkillRoll {
    associated_attribute: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCombat {
    #[serde(deserialize_with = "nullable")]
    parry: Field<i32>,
    notes: Loose,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
    #[serde(deserialize_with = "nullable")]
    name: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    kind: String,
    #[serde(deserialize_with = "nullable")]
    system: RawItemSystem,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItemSystem {
    description: Loose,
    qualities: Loose,
}

impl RawSkill {
    fn into_skill(self, key: String) -> Skill {
        Skill {
            key,
            favoured: self.favoured.0,
            attribute: self
                .roll
                .and_then(|r| r.associated_attribute)
                .map(|a| a.to_lowercase()),
            label: self.label,
            rating: self.value,
        }
    }
}

fn collect_skills(raw: RawSkills) -> IndexMap<String, Skill> {
    match raw {
        RawSkills::Map(map) => map
            .into_iter()
            .map(|(key, skill)| (key.clone(), skill.into_skill(key)))
            .collect(),
        RawSkills::List(list) => list
            .into_iter()
            .enumerate()
            .map(|(idx, skill)| {
                let key = skill
                    .skill_key
                    .clone()
                    .or_else(|| skill.label.as_deref().map(|l| parse_label(l).to_lowercase()))
                    .unwrap_or_else(|| format!("skill{}", idx));
                (key.clone(), skill.into_skill(key))
            })
            .collect(),
    }
}

impl From<RawCharacter> for Character {
    fn from(raw: RawCharacter) -> Self {
        let sys = raw.system;
        let health = sys.state_of_health;
        let conditions = [
            (ConditionKind::Miserable, health.miserable.0),
            (ConditionKind::Weary, health.weary.0),
            (ConditionKind::Wounded, health.wounded.0),
        ]
        .into_iter()
        .filter_map(|(kind, on)| on.then_some(kind))
        .collect();

        let bio = sys.biography;
        let res = sys.resources;

        Character {
            name: raw.name.filter(|n| !n.is_empty()).unwrap_or_else(|| "Unnamed".to_string()),
            portrait: raw
                .prototype_token
                .and_then(|t| t.texture)
                .and_then(|t| t.src)
                .filter(|s| !s.is_empty()),
            biography: Biography {
                culture: text(&bio.culture),
                cultural_blessing: text(&bio.cultural_blessing),
                calling: text(&bio.calling),
                standard_of_living: text(&bio.standard_of_living),
                patron: text(&bio.patron),
                shadow_path: text(&bio.shadow_path),
            },
            conditions,
            resources: Resources {
                endurance: Pool { value: res.endurance.value, max: res.endurance.max },
                hope: Pool { value: res.hope.value, max: res.hope.max },
                shadow: res.shadow.temporary.value,
                shadow_scars: res.shadow.shadow_scars.value,
                travel_load: res.travel_load.value,
                fatigue: text(&res.fatigue),
                protection: text(&res.protection),
            },
            attributes: sys
                .attributes
                .into_iter()
                .map(|(key, attr)| {
                    let label = attr.label.filter(|l| !l.is_empty()).unwrap_or_else(|| key.clone());
                    (key.clone(), Attribute { key, label, rating: attr.value })
                })
                .collect(),
            skills: collect_skills(sys.common_skills),
            combat: Combat {
                parry: sys.combat_attributes.parry.value,
                notes: text(&sys.combat_attributes.notes),
            },
            treasure: text(&sys.treasure),
            features: text(&sys.features),
            flaws: text(&sys.flaws),
            items: raw
                .items
                .into_iter()
                .map(|i| Item {
                    name: i.name,
                    kind: i.kind,
                    description: text(&i.system.description),
                    qualities: text(&i.system.qualities),
                })
                .collect(),
        }
    }
}
