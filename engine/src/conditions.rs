use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A character condition that can be ticked on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Miserable,
    Weary,
    Wounded,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 3] = [Self::Miserable, Self::Weary, Self::Wounded];

    /// Parse a condition tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "miserable" => Some(Self::Miserable),
            "weary" => Some(Self::Weary),
            "wounded" => Some(Self::Wounded),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miserable => "miserable",
            Self::Weary => "weary",
            Self::Wounded => "wounded",
        }
    }

    /// Human label, as shown next to the sheet checkbox.
    pub fn label(self) -> &'static str {
        match self {
            Self::Miserable => "Miserable",
            Self::Weary => "Weary",
            Self::Wounded => "Wounded",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of conditions currently affecting a character.
///
/// Only `Miserable` and `Weary` change how a roll resolves; other tags ride
/// along untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StateFlags(BTreeSet<ConditionKind>);

impl StateFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from free-form tags, silently skipping ones we don't know.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::new();
        for tag in tags {
            match ConditionKind::parse(tag.as_ref()) {
                Some(kind) => flags.insert(kind),
                None => tracing::trace!(tag = tag.as_ref(), "ignoring unknown condition tag"),
            }
        }
        flags
    }

    pub fn with(mut self, kind: ConditionKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: ConditionKind) {
        self.0.insert(kind);
    }

    pub fn contains(&self, kind: ConditionKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_miserable(&self) -> bool {
        self.contains(ConditionKind::Miserable)
    }

    pub fn is_weary(&self) -> bool {
        self.contains(ConditionKind::Weary)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ConditionKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ConditionKind> for StateFlags {
    fn from_iter<T: IntoIterator<Item = ConditionKind>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for StateFlags {
    fn from(tags: Vec<String>) -> Self {
        Self::from_tags(tags)
    }
}

impl From<StateFlags> for Vec<String> {
    fn from(flags: StateFlags) -> Self {
        flags.iter().map(|k| k.as_str().to_string()).collect()
    }
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let tags: Vec<_> = self.iter().map(ConditionKind::as_str).collect();
        f.write_str(&tags.join(", "))
    }
}
