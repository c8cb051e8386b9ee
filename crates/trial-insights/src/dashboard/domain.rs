use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a named dashboard profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five fixed buckets an insight can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Logistics Challenge")]
    LogisticsChallenge,
    Motivation,
    #[serde(rename = "Healthcare Engagement")]
    HealthcareEngagement,
    #[serde(rename = "Quality of Life")]
    QualityOfLife,
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::LogisticsChallenge,
        Category::Motivation,
        Category::HealthcareEngagement,
        Category::QualityOfLife,
        Category::Uncategorized,
    ];

    /// Scored categories in radar-axis order.
    pub const SCORED: [Category; 4] = [
        Category::HealthcareEngagement,
        Category::Motivation,
        Category::QualityOfLife,
        Category::LogisticsChallenge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::LogisticsChallenge => "Logistics Challenge",
            Category::Motivation => "Motivation",
            Category::HealthcareEngagement => "Healthcare Engagement",
            Category::QualityOfLife => "Quality of Life",
            Category::Uncategorized => "Uncategorized",
        }
    }

    pub fn is_scored(self) -> bool {
        !matches!(self, Category::Uncategorized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryParseError(value.to_string()))
    }
}

/// Raised when a label outside the fixed category set reaches the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category label '{0}'")]
pub struct CategoryParseError(pub String);

/// Serde adapter for an item's placement: `""` is the available list,
/// anything else must be one of the five category labels.
pub mod placement {
    use super::Category;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Category>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(category) => serializer.serialize_str(category.label()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse::<Category>().map(Some).map_err(de::Error::custom)
    }
}

/// Coarse display hint attached to each scored category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiplierLevel {
    Low,
    Medium,
    High,
}

impl MultiplierLevel {
    pub fn label(self) -> &'static str {
        match self {
            MultiplierLevel::Low => "Low",
            MultiplierLevel::Medium => "Medium",
            MultiplierLevel::High => "High",
        }
    }
}

/// Immutable survey question from the reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub name: String,
    pub score: f64,
    #[serde(rename = "initialProfile", default)]
    pub initial_profiles: BTreeSet<ProfileId>,
    #[serde(
        rename = "allowedCategories",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_categories: Option<BTreeSet<Category>>,
}

/// Working-state copy of a question inside a profile.
///
/// This is also the drag payload exchanged with the presentation layer: it
/// always carries the id, display name, current placement and point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(with = "placement", default)]
    pub category: Option<Category>,
    pub score: f64,
}

impl Item {
    pub fn from_question(question: &Question, category: Option<Category>) -> Self {
        Self {
            id: question.id.clone(),
            name: question.name.clone(),
            category,
            score: question.score,
        }
    }
}

/// Category buckets plus the available list for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialData {
    pub buckets: BTreeMap<Category, Vec<Item>>,
    pub available: Vec<Item>,
}

impl Default for TrialData {
    fn default() -> Self {
        Self {
            buckets: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
            available: Vec::new(),
        }
    }
}

impl TrialData {
    pub fn items(&self, placement: Option<Category>) -> &[Item] {
        match placement {
            Some(category) => self
                .buckets
                .get(&category)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            None => &self.available,
        }
    }

    /// Where the item currently lives, `Some(None)` meaning the available list.
    pub fn locate(&self, item_id: &str) -> Option<Option<Category>> {
        if self.available.iter().any(|item| item.id == item_id) {
            return Some(None);
        }
        self.buckets
            .iter()
            .find(|(_, items)| items.iter().any(|item| item.id == item_id))
            .map(|(category, _)| Some(*category))
    }

    pub fn occurrences(&self, item_id: &str) -> usize {
        self.available
            .iter()
            .chain(self.buckets.values().flatten())
            .filter(|item| item.id == item_id)
            .count()
    }

    pub fn total_items(&self) -> usize {
        self.available.len() + self.buckets.values().map(Vec::len).sum::<usize>()
    }

    pub(crate) fn take(&mut self, placement: Option<Category>, item_id: &str) -> Option<Item> {
        let items = match placement {
            Some(category) => self.buckets.get_mut(&category)?,
            None => &mut self.available,
        };
        let position = items.iter().position(|item| item.id == item_id)?;
        Some(items.remove(position))
    }

    pub(crate) fn insert(&mut self, item: Item) {
        match item.category {
            Some(category) => self.buckets.entry(category).or_default().push(item),
            None => self.available.push(item),
        }
    }
}

/// Derived score state for one scored category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScoreEntry {
    pub name: Category,
    pub questions: BTreeSet<String>,
    pub current_score: f64,
    pub multiplier_level: MultiplierLevel,
}
