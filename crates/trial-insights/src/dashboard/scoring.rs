use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::catalog::ReferenceDataset;
use super::domain::{Category, Item, MultiplierLevel, ProfileId};

pub const MIN_CATEGORY_SCORE: f64 = 0.0;
pub const MAX_CATEGORY_SCORE: f64 = 10.0;

const EMBEDDED_RULES: &str = include_str!("../../data/scoring_rules.json");

/// Coefficients and display level for one (profile, category) pair.
///
/// Only `add` feeds the score. `remove` is carried for the presentation
/// layer's tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub add: f64,
    pub remove: f64,
    pub level: MultiplierLevel,
}

impl CategoryRule {
    pub const NEUTRAL: CategoryRule = CategoryRule {
        add: 0.0,
        remove: 0.0,
        level: MultiplierLevel::Low,
    };
}

/// Per-profile, per-category coefficient lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringRuleTable {
    rules: BTreeMap<ProfileId, BTreeMap<Category, CategoryRule>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringTableError {
    #[error("unable to read scoring rules {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scoring rules are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scoring rules for profile '{profile}' name unknown category '{label}'")]
    UnknownCategory { profile: ProfileId, label: String },
    #[error("no scoring rule for profile '{profile}' and category '{category}'")]
    MissingRule {
        profile: ProfileId,
        category: Category,
    },
    #[error("negative coefficient for profile '{profile}' and category '{category}'")]
    NegativeCoefficient {
        profile: ProfileId,
        category: Category,
    },
}

impl ScoringRuleTable {
    pub fn embedded() -> Result<Self, ScoringTableError> {
        Self::from_json(EMBEDDED_RULES)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringTableError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ScoringTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScoringTableError> {
        let parsed: BTreeMap<ProfileId, BTreeMap<String, CategoryRule>> =
            serde_json::from_str(raw)?;

        let mut table = Self::default();
        for (profile, by_label) in parsed {
            for (label, rule) in by_label {
                let category = label.parse::<Category>().map_err(|_| {
                    ScoringTableError::UnknownCategory {
                        profile: profile.clone(),
                        label: label.clone(),
                    }
                })?;
                table.insert(profile.clone(), category, rule);
            }
        }
        Ok(table)
    }

    pub fn insert(&mut self, profile: ProfileId, category: Category, rule: CategoryRule) {
        self.rules.entry(profile).or_default().insert(category, rule);
    }

    pub fn rule(&self, profile: &ProfileId, category: Category) -> Option<CategoryRule> {
        self.rules
            .get(profile)
            .and_then(|by_category| by_category.get(&category))
            .copied()
    }

    /// Every dataset profile must carry a non-negative rule for each scored
    /// category.
    pub fn validate_against(&self, dataset: &ReferenceDataset) -> Result<(), ScoringTableError> {
        for seed in dataset.profiles() {
            for category in Category::SCORED {
                let rule = self.rule(&seed.id, category).ok_or_else(|| {
                    ScoringTableError::MissingRule {
                        profile: seed.id.clone(),
                        category,
                    }
                })?;
                if rule.add < 0.0 || rule.remove < 0.0 {
                    return Err(ScoringTableError::NegativeCoefficient {
                        profile: seed.id.clone(),
                        category,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Re-sums the full membership; never incremental.
pub fn category_score(members: &[Item], rule: &CategoryRule) -> f64 {
    let raw: f64 = members.iter().map(|item| item.score * rule.add).sum();
    raw.max(MIN_CATEGORY_SCORE).min(MAX_CATEGORY_SCORE)
}
