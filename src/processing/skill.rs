//! Canonical skill values and skill sets

use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// A canonical, lowercase skill name.
///
/// Only the normalizer hands these out, so every `Skill` is already trimmed,
/// lowercased and alias-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Skill(String);

impl Skill {
    pub(crate) fn from_canonical(canonical: String) -> Self {
        Skill(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Skill {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Skills found in one document. Unordered; sort explicitly for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    skills: HashSet<Skill>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.as_str() == skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn is_subset(&self, other: &SkillSet) -> bool {
        self.skills.is_subset(&other.skills)
    }

    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.skills.intersection(&other.skills).cloned().collect()
    }

    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.skills.difference(&other.skills).cloned().collect()
    }

    pub fn union(&self, other: &SkillSet) -> SkillSet {
        self.skills.union(&other.skills).cloned().collect()
    }

    /// Skills in alphabetical order of their canonical form
    pub fn sorted(&self) -> Vec<&Skill> {
        let mut skills: Vec<&Skill> = self.skills.iter().collect();
        skills.sort();
        skills
    }

    pub fn sorted_names(&self) -> Vec<String> {
        self.sorted().into_iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        Self {
            skills: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SkillSet {
    type Item = Skill;
    type IntoIter = std::collections::hash_set::IntoIter<Skill>;

    fn into_iter(self) -> Self::IntoIter {
        self.skills.into_iter()
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}
