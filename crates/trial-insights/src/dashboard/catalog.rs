use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::demographics::{DemographicUpdate, ProfileDetails};
use super::domain::{Category, Item, ProfileId, Question};

/// Display name used for items whose question id is not in the catalog.
pub const UNKNOWN_QUESTION_NAME: &str = "Unknown question";

const EMBEDDED_DATASET: &str = include_str!("../../data/reference_dataset.json");

/// One predefined category bucket in a profile seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub questions: Vec<String>,
}

/// Static description of a profile as shipped in the reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSeed {
    pub id: ProfileId,
    pub name: String,
    pub profile_details: ProfileDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<DemographicUpdate>,
    /// Empty means the profile is distributed round-robin at construction.
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

impl ProfileSeed {
    /// Seed buckets with their labels resolved. Labels are checked at load.
    pub fn predefined(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        self.categories.iter().filter_map(|seed| {
            seed.name
                .parse::<Category>()
                .ok()
                .map(|category| (category, seed.questions.as_slice()))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(rename = "allQuestions")]
    all_questions: Vec<Question>,
    profiles: Vec<ProfileSeed>,
}

/// Read-only question catalog and profile seeds, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    questions: Vec<Question>,
    index: HashMap<String, usize>,
    profiles: Vec<ProfileSeed>,
}

/// Failures while loading or validating the reference dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unable to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dataset defines no profiles")]
    NoProfiles,
    #[error("question id '{0}' is defined more than once")]
    DuplicateQuestion(String),
    #[error("profile '{0}' is defined more than once")]
    DuplicateProfile(ProfileId),
    #[error("profile '{profile}' seeds unknown category '{category}'")]
    UnknownCategory { profile: ProfileId, category: String },
    #[error("profile '{profile}' assigns question '{question}' more than once")]
    DuplicateAssignment { profile: ProfileId, question: String },
    #[error("profile '{profile}' seeds question '{question}' into '{category}', which it does not allow")]
    DisallowedPlacement {
        profile: ProfileId,
        question: String,
        category: Category,
    },
}

impl ReferenceDataset {
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let RawDataset {
            all_questions,
            profiles,
        } = serde_json::from_str(raw)?;
        Self::new(all_questions, profiles)
    }

    /// Validates the seeds and folds seeded profiles into each question's
    /// `initialProfile` membership.
    pub fn new(
        mut questions: Vec<Question>,
        profiles: Vec<ProfileSeed>,
    ) -> Result<Self, DatasetError> {
        if profiles.is_empty() {
            return Err(DatasetError::NoProfiles);
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if index.insert(question.id.clone(), position).is_some() {
                return Err(DatasetError::DuplicateQuestion(question.id.clone()));
            }
        }

        let mut seen_profiles = HashSet::new();
        for profile in &profiles {
            if !seen_profiles.insert(profile.id.clone()) {
                return Err(DatasetError::DuplicateProfile(profile.id.clone()));
            }

            let mut assigned = HashSet::new();
            for seed in &profile.categories {
                let Ok(category) = seed.name.parse::<Category>() else {
                    return Err(DatasetError::UnknownCategory {
                        profile: profile.id.clone(),
                        category: seed.name.clone(),
                    });
                };
                for question_id in &seed.questions {
                    if !assigned.insert(question_id.as_str()) {
                        return Err(DatasetError::DuplicateAssignment {
                            profile: profile.id.clone(),
                            question: question_id.clone(),
                        });
                    }
                    if let Some(&position) = index.get(question_id) {
                        let question = &mut questions[position];
                        if !permits(question, category) {
                            return Err(DatasetError::DisallowedPlacement {
                                profile: profile.id.clone(),
                                question: question_id.clone(),
                                category,
                            });
                        }
                        question.initial_profiles.insert(profile.id.clone());
                    }
                }
            }
        }

        Ok(Self {
            questions,
            index,
            profiles,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn profiles(&self) -> &[ProfileSeed] {
        &self.profiles
    }

    pub fn profile_seed(&self, profile_id: &ProfileId) -> Option<&ProfileSeed> {
        self.profiles.iter().find(|seed| &seed.id == profile_id)
    }

    /// Absence is not an error: callers treat it as zero score and a
    /// placeholder name.
    pub fn question_by_id(&self, question_id: &str) -> Option<&Question> {
        self.index
            .get(question_id)
            .and_then(|&position| self.questions.get(position))
    }

    pub fn question_score(&self, question_id: &str) -> f64 {
        self.question_by_id(question_id)
            .map(|question| question.score)
            .unwrap_or(0.0)
    }

    pub fn calculate_average_score<S: AsRef<str>>(&self, question_ids: &[S]) -> f64 {
        if question_ids.is_empty() {
            return 0.0;
        }
        let total: f64 = question_ids
            .iter()
            .map(|id| self.question_score(id.as_ref()))
            .sum();
        total / question_ids.len() as f64
    }

    /// Placement constraint used while distributing a profile. Questions
    /// without a constraint, and unknown ids, may go anywhere. Seeds are
    /// checked against the same rule at load.
    pub fn can_question_be_in_category(&self, question_id: &str, category: Category) -> bool {
        self.question_by_id(question_id)
            .map_or(true, |question| permits(question, category))
    }

    /// Unplaced working items for every question seeded into the profile.
    pub fn questions_for_profile(&self, profile_id: &ProfileId) -> Vec<Item> {
        self.questions
            .iter()
            .filter(|question| question.initial_profiles.contains(profile_id))
            .map(|question| Item::from_question(question, None))
            .collect()
    }

    /// Working item for a seed reference, with the unknown-id placeholder.
    pub fn item_for(&self, question_id: &str, category: Option<Category>) -> Item {
        match self.question_by_id(question_id) {
            Some(question) => Item::from_question(question, category),
            None => Item {
                id: question_id.to_string(),
                name: UNKNOWN_QUESTION_NAME.to_string(),
                category,
                score: 0.0,
            },
        }
    }

    pub fn profile_ids(&self) -> BTreeSet<ProfileId> {
        self.profiles.iter().map(|seed| seed.id.clone()).collect()
    }
}

/// Uncategorized accepts every question.
fn permits(question: &Question, category: Category) -> bool {
    category == Category::Uncategorized
        || question
            .allowed_categories
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_loads() {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset parses");
        assert!(!dataset.profiles().is_empty());
        assert!(dataset.questions().len() >= 10);
    }

    #[test]
    fn average_score_guards_empty_and_unknown_input() {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset parses");
        let empty: [&str; 0] = [];
        assert_eq!(dataset.calculate_average_score(&empty), 0.0);
        assert_eq!(dataset.calculate_average_score(&["unknown-id"]), 0.0);
        assert_eq!(dataset.question_score("unknown-id"), 0.0);
        assert!(dataset.question_by_id("unknown-id").is_none());
    }

    #[test]
    fn average_score_is_arithmetic_mean() {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset parses");
        let first = &dataset.questions()[0];
        let second = &dataset.questions()[1];
        let expected = (first.score + second.score + 0.0) / 3.0;
        let average =
            dataset.calculate_average_score(&[first.id.as_str(), second.id.as_str(), "missing"]);
        assert!((average - expected).abs() < 1e-12);
    }

    #[test]
    fn unknown_seed_reference_gets_placeholder_item() {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset parses");
        let item = dataset.item_for("not-a-question", Some(Category::Motivation));
        assert_eq!(item.name, UNKNOWN_QUESTION_NAME);
        assert_eq!(item.score, 0.0);
        assert_eq!(item.category, Some(Category::Motivation));
    }

    #[test]
    fn rejects_unknown_seed_category() {
        let raw = r#"{
            "allQuestions": [{"id": "q1", "name": "Travel", "score": 2}],
            "profiles": [{
                "id": "p1",
                "name": "Profile",
                "profile_details": {"origin": {}, "age": 40, "role": {}},
                "categories": [{"name": "Finance", "questions": ["q1"]}]
            }]
        }"#;
        let error = ReferenceDataset::from_json(raw).expect_err("unknown category rejected");
        assert!(matches!(error, DatasetError::UnknownCategory { .. }));
    }

    #[test]
    fn rejects_question_seeded_twice_in_one_profile() {
        let raw = r#"{
            "allQuestions": [{"id": "q1", "name": "Travel", "score": 2}],
            "profiles": [{
                "id": "p1",
                "name": "Profile",
                "profile_details": {"origin": {}, "age": 40, "role": {}},
                "categories": [
                    {"name": "Motivation", "questions": ["q1"]},
                    {"name": "Quality of Life", "questions": ["q1"]}
                ]
            }]
        }"#;
        let error = ReferenceDataset::from_json(raw).expect_err("duplicate rejected");
        assert!(matches!(error, DatasetError::DuplicateAssignment { .. }));
    }

    #[test]
    fn rejects_seed_outside_allowed_categories() {
        let raw = r#"{
            "allQuestions": [{
                "id": "q1", "name": "Travel", "score": 2,
                "allowedCategories": ["Logistics Challenge"]
            }],
            "profiles": [{
                "id": "p1",
                "name": "Profile",
                "profile_details": {"origin": {}, "age": 40, "role": {}},
                "categories": [{"name": "Motivation", "questions": ["q1"]}]
            }]
        }"#;
        let error = ReferenceDataset::from_json(raw).expect_err("disallowed seed rejected");
        assert!(matches!(
            error,
            DatasetError::DisallowedPlacement {
                category: Category::Motivation,
                ..
            }
        ));
    }

    #[test]
    fn seed_may_park_constrained_question_in_uncategorized() {
        let raw = r#"{
            "allQuestions": [{
                "id": "q1", "name": "Travel", "score": 2,
                "allowedCategories": ["Logistics Challenge"]
            }],
            "profiles": [{
                "id": "p1",
                "name": "Profile",
                "profile_details": {"origin": {}, "age": 40, "role": {}},
                "categories": [{"name": "Uncategorized", "questions": ["q1"]}]
            }]
        }"#;
        assert!(ReferenceDataset::from_json(raw).is_ok());
    }

    #[test]
    fn rejects_empty_profile_list() {
        let raw = r#"{"allQuestions": [], "profiles": []}"#;
        assert!(matches!(
            ReferenceDataset::from_json(raw),
            Err(DatasetError::NoProfiles)
        ));
    }

    #[test]
    fn seeded_questions_join_profile_membership() {
        let raw = r#"{
            "allQuestions": [
                {"id": "q1", "name": "Travel", "score": 2},
                {"id": "q2", "name": "Cost", "score": 3, "initialProfile": ["p1"]},
                {"id": "q3", "name": "Other", "score": 1}
            ],
            "profiles": [{
                "id": "p1",
                "name": "Profile",
                "profile_details": {"origin": {}, "age": 40, "role": {}},
                "categories": [{"name": "Motivation", "questions": ["q1"]}]
            }]
        }"#;
        let dataset = ReferenceDataset::from_json(raw).expect("dataset parses");
        let ids: Vec<String> = dataset
            .questions_for_profile(&ProfileId::new("p1"))
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec!["q1".to_string(), "q2".to_string()]);
    }

    #[test]
    fn placement_constraint_respects_allowed_categories() {
        let raw = r#"{
            "allQuestions": [{
                "id": "q1", "name": "Travel", "score": 2,
                "allowedCategories": ["Logistics Challenge"]
            }],
            "profiles": [{
                "id": "p1",
                "name": "Profile",
                "profile_details": {"origin": {}, "age": 40, "role": {}}
            }]
        }"#;
        let dataset = ReferenceDataset::from_json(raw).expect("dataset parses");
        assert!(dataset.can_question_be_in_category("q1", Category::LogisticsChallenge));
        assert!(!dataset.can_question_be_in_category("q1", Category::Motivation));
        assert!(dataset.can_question_be_in_category("q1", Category::Uncategorized));
        assert!(dataset.can_question_be_in_category("missing", Category::Motivation));
    }
}
