//! Skill normalization: case, punctuation and alias resolution

use crate::error::{Result, SkillFitError};
use crate::processing::lexicon::DEFAULT_ALIASES;
use crate::processing::skill::{Skill, SkillSet};
use std::collections::{BTreeMap, HashMap};

/// Maps raw tokens and phrases onto canonical skills
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    aliases: HashMap<String, String>,
}

impl SkillNormalizer {
    /// Normalizer with the built-in alias table
    pub fn builtin() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect();
        Self { aliases }
    }

    /// Built-in aliases plus configured ones.
    ///
    /// Every alias target must already be canonical and must not be an alias
    /// itself, so resolution stays a single lookup.
    pub fn with_extra_aliases(extra: &BTreeMap<String, String>) -> Result<Self> {
        let mut normalizer = Self::builtin();

        for (raw_alias, raw_target) in extra {
            let alias = canonical_form(raw_alias).ok_or_else(|| {
                SkillFitError::Configuration(format!("alias '{}' is not a valid skill name", raw_alias))
            })?;
            let target = canonical_form(raw_target).ok_or_else(|| {
                SkillFitError::Configuration(format!("alias target '{}' is not a valid skill name", raw_target))
            })?;
            if alias == target {
                continue;
            }
            normalizer.aliases.insert(alias, target);
        }

        normalizer.check_single_hop()?;
        Ok(normalizer)
    }

    fn check_single_hop(&self) -> Result<()> {
        for (alias, target) in &self.aliases {
            if self.aliases.contains_key(target) {
                return Err(SkillFitError::Configuration(format!(
                    "alias '{}' points at '{}', which is itself an alias",
                    alias, target
                )));
            }
        }
        Ok(())
    }

    /// Canonicalize a raw string into at most one skill
    pub fn normalize(&self, raw: &str) -> Option<Skill> {
        let form = canonical_form(raw)?;
        let canonical = match self.aliases.get(&form) {
            Some(target) => target.clone(),
            None => form,
        };
        Some(Skill::from_canonical(canonical))
    }

    /// Normalize a batch of raw names, dropping rejects
    pub fn skill_set<I, S>(&self, raw: I) -> SkillSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|s| self.normalize(s.as_ref()))
            .collect()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub(crate) fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(|s| s.as_str())
    }
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Case and punctuation folding without alias resolution.
///
/// Keeps alphanumerics, `+`/`#` directly after a kept symbol (`c++`, `c#`) and
/// `.` directly before an alphanumeric (`node.js`, `.net`). Everything else
/// becomes whitespace, which is then collapsed. Returns `None` for results
/// shorter than two characters or made only of digits.
pub fn canonical_form(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut folded = String::with_capacity(lowered.len());

    for (i, &c) in chars.iter().enumerate() {
        let keep = if c.is_alphanumeric() {
            true
        } else {
            match c {
                '+' | '#' => folded
                    .chars()
                    .last()
                    .map_or(false, |p| p.is_alphanumeric() || p == '+' || p == '#'),
                '.' => chars.get(i + 1).map_or(false, |n| n.is_alphanumeric()),
                _ => false,
            }
        };
        folded.push(if keep { c } else { ' ' });
    }

    let canonical = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    if canonical.chars().count() < 2 {
        return None;
    }
    if canonical
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ' ')
    {
        return None;
    }

    Some(canonical)
}
