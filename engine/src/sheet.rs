//! Display values for a character sheet.
//!
//! [`SheetView::build`] turns a typed [`Character`] into everything a front
//! end needs to draw: target numbers, skill pips, grouped skills and
//! tooltip-annotated gear. [`render_text`] is a plain-text rendering of it.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::actor::{Character, Item, Pool};
use crate::check::target_number;
use crate::conditions::ConditionKind;
use crate::tooltips::{Term, Tooltips};

/// Slots in a skill rating track.
pub const PIP_SLOTS: usize = 6;
const PIP_FULL: &str = "■";
const PIP_EMPTY: &str = "□";
const FAVOURED: &str = "★";
const NOT_FAVOURED: &str = "○";
const IMAGE_DIR: &str = "images";

/// Attribute key and heading for each skill column, in display order.
pub const SKILL_GROUPS: [(&str, &str); 3] = [
    ("strength", "Strength-based"),
    ("heart", "Heart-based"),
    ("wits", "Wits-based"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetView {
    pub name: String,
    pub culture: Option<String>,
    pub portrait_url: Option<String>,
    pub conditions: Vec<ConditionBox>,
    pub endurance: Pool,
    pub load: i32,
    pub fatigue: String,
    pub hope: Pool,
    pub shadow: i32,
    pub scars: i32,
    pub info: Vec<InfoLine>,
    pub virtues: Vec<ItemLine>,
    pub rewards: Vec<ItemLine>,
    pub attributes: Vec<AttributeView>,
    pub skill_groups: Vec<SkillGroup>,
    pub combat: CombatView,
    pub gear: Vec<GearView>,
    pub treasure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionBox {
    pub kind: ConditionKind,
    pub label: &'static str,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLine {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeView {
    pub key: String,
    pub name: String,
    pub rating: i32,
    pub tn: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGroup {
    pub attribute: &'static str,
    pub heading: &'static str,
    pub skills: Vec<SkillView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillView {
    pub key: String,
    pub name: String,
    pub rating: i32,
    pub favoured: bool,
    pub symbol: &'static str,
    pub pips: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatView {
    pub parry: i32,
    pub protection: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GearView {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub qualities: Vec<Term>,
}

/// `tor2e.commonSkills.enhearten` → `Enhearten`.
///
/// Takes the text after the last `.` (the whole label if there is none) and
/// upper-cases its first letter. Empty labels read `Unnamed`.
pub fn parse_label(label: &str) -> String {
    if label.is_empty() {
        return "Unnamed".to_string();
    }
    let base = match label.rsplit_once('.') {
        Some((_, tail)) if !tail.is_empty() => tail,
        _ => label,
    };
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rating track: filled squares for the rating, clamped to `0..=6`.
pub fn pips(rating: i32) -> String {
    let filled = usize::try_from(rating).unwrap_or(0).min(PIP_SLOTS);
    format!("{}{}", PIP_FULL.repeat(filled), PIP_EMPTY.repeat(PIP_SLOTS - filled))
}

pub fn favoured_symbol(favoured: bool) -> &'static str {
    if favoured {
        FAVOURED
    } else {
        NOT_FAVOURED
    }
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

fn item_lines<'a>(items: impl Iterator<Item = &'a Item>) -> Vec<ItemLine> {
    items
        .map(|i| ItemLine { name: i.name.clone(), description: or_default(&i.description, "") })
        .collect()
}

impl SheetView {
    pub fn build(character: &Character, tooltips: &Tooltips) -> Self {
        let bio = &character.biography;
        let res = &character.resources;

        let conditions = ConditionKind::ALL
            .into_iter()
            .map(|kind| ConditionBox {
                kind,
                label: kind.label(),
                checked: character.conditions.contains(kind),
            })
            .collect();

        let info = vec![
            InfoLine { label: "Heroic Culture", value: or_default(&bio.culture, "") },
            InfoLine { label: "Cultural Blessing", value: or_default(&bio.cultural_blessing, "") },
            InfoLine { label: "Calling", value: or_default(&bio.calling, "") },
            InfoLine { label: "Living Standard", value: or_default(&bio.standard_of_living, "") },
            InfoLine { label: "Patron", value: or_default(&bio.patron, "None") },
            InfoLine { label: "Features", value: or_default(&character.features, "N/A") },
            InfoLine { label: "Shadow Curse", value: or_default(&bio.shadow_path, "") },
            InfoLine { label: "Flaws", value: or_default(&character.flaws, "None") },
        ];

        let attributes = character
            .attributes
            .values()
            .map(|a| AttributeView {
                key: a.key.clone(),
                name: a.name(),
                rating: a.rating,
                tn: target_number(a.rating),
            })
            .collect();

        let skill_groups = SKILL_GROUPS
            .iter()
            .map(|&(attribute, heading)| {
                // BTreeMap orders the column by skill key.
                let sorted: BTreeMap<&str, SkillView> = character
                    .skills
                    .values()
                    .filter(|s| s.attribute.as_deref() == Some(attribute))
                    .map(|s| {
                        let view = SkillView {
                            key: s.key.clone(),
                            name: s.name(),
                            rating: s.rating,
                            favoured: s.favoured,
                            symbol: favoured_symbol(s.favoured),
                            pips: pips(s.rating),
                        };
                        (s.key.as_str(), view)
                    })
                    .collect();
                SkillGroup { attribute, heading, skills: sorted.into_values().collect() }
            })
            .collect();

        let gear = character
            .items_of(&["weapon", "armour"])
            .map(|i| GearView {
                name: i.name.clone(),
                kind: i.kind.clone(),
                description: i.description.clone(),
                qualities: i
                    .qualities
                    .as_deref()
                    .map(|q| tooltips.annotate(q))
                    .unwrap_or_default(),
            })
            .collect();

        SheetView {
            name: character.name.clone(),
            culture: bio.culture.clone(),
            portrait_url: character.portrait.as_ref().map(|src| format!("{}/{}", IMAGE_DIR, src)),
            conditions,
            endurance: res.endurance,
            load: res.travel_load,
            fatigue: or_default(&res.fatigue, "0"),
            hope: res.hope,
            shadow: res.shadow,
            scars: res.shadow_scars,
            info,
            virtues: item_lines(character.items_of(&["virtues"])),
            rewards: item_lines(character.items_of(&["reward"])),
            attributes,
            skill_groups,
            combat: CombatView {
                parry: character.combat.parry,
                protection: or_default(&res.protection, "0d"),
                notes: or_default(&character.combat.notes, "-"),
            },
            gear,
            treasure: or_default(&character.treasure, "0"),
        }
    }
}

fn push_terms(out: &mut String, terms: &[Term]) {
    let words: Vec<String> = terms
        .iter()
        .map(|t| match t {
            Term::Tip { text, .. } => format!("{}*", text),
            Term::Plain { text } => text.clone(),
        })
        .collect();
    out.push_str(&words.join(" "));
}

/// Plain-text rendering of a sheet, one section per block.
///
/// Gear qualities with a tooltip are starred and explained at the bottom.
pub fn render_text(view: &SheetView) -> String {
    let mut out = String::new();
    // fmt::Write into a String never fails.
    let _ = write_sheet(&mut out, view);
    out
}

fn write_sheet(out: &mut String, view: &SheetView) -> fmt::Result {
    writeln!(out, "== {} ==", view.name)?;
    if let Some(culture) = &view.culture {
        writeln!(out, "{}", culture)?;
    }
    let boxes: Vec<String> = view
        .conditions
        .iter()
        .map(|c| format!("[{}] {}", if c.checked { "x" } else { " " }, c.label))
        .collect();
    writeln!(out, "{}", boxes.join("  "))?;
    if let Some(url) = &view.portrait_url {
        writeln!(out, "Portrait: {}", url)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Endurance {}/{}  Load {}  Fatigue {}",
        view.endurance.value, view.endurance.max, view.load, view.fatigue
    )?;
    writeln!(
        out,
        "Hope {}/{}  Shadow {}  Scars {}",
        view.hope.value, view.hope.max, view.shadow, view.scars
    )?;

    writeln!(out, "\n-- Character --")?;
    for line in &view.info {
        writeln!(out, "{}: {}", line.label, line.value)?;
    }

    for (title, lines) in [("Virtues", &view.virtues), ("Rewards", &view.rewards)] {
        writeln!(out, "\n-- {} --", title)?;
        for l in lines {
            writeln!(out, "{}: {}", l.name, l.description)?;
        }
    }

    writeln!(out, "\n-- Attributes --")?;
    for a in &view.attributes {
        writeln!(out, "{:<10} TN {:>2} ({})", a.name, a.tn, a.rating)?;
    }

    writeln!(out, "\n-- Common Skills --")?;
    for group in &view.skill_groups {
        writeln!(out, "{}", group.heading)?;
        for s in &group.skills {
            writeln!(out, "  {} {:<12} {}", s.symbol, s.name, s.pips)?;
        }
    }

    writeln!(out, "\n-- Combat --")?;
    writeln!(out, "Parry {}  Protection {}", view.combat.parry, view.combat.protection)?;
    writeln!(out, "Notes: {}", view.combat.notes)?;

    writeln!(out, "\n-- Gear --")?;
    let mut glossary: BTreeMap<&str, &str> = BTreeMap::new();
    for g in &view.gear {
        write!(out, "{} ({})", g.name, g.kind)?;
        if !g.qualities.is_empty() {
            out.push_str(" [");
            push_terms(out, &g.qualities);
            out.push(']');
        }
        out.push('\n');
        for t in &g.qualities {
            if let Term::Tip { text, tip } = t {
                glossary.insert(text, tip);
            }
        }
    }
    writeln!(out, "Treasure: {}", view.treasure)?;

    if !glossary.is_empty() {
        writeln!(out, "\n-- Glossary --")?;
        for (term, tip) in glossary {
            writeln!(out, "{}: {}", term, tip)?;
        }
    }

    Ok(())
}
