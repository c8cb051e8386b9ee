use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::AppError;

use super::catalog::{ProfileSeed, ReferenceDataset};
use super::demographics::{DemographicUpdate, PatientDemographic};
use super::distribution::initial_distribution;
use super::domain::{placement, Category, CategoryScoreEntry, Item, ProfileId, TrialData};
use super::scoring::{category_score, CategoryRule, ScoringRuleTable, ScoringTableError};
use super::views::{RadarAxis, RadarChartView};

/// One independent dashboard scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub trial_data: TrialData,
    pub demographic: PatientDemographic,
    /// One entry per scored category, in radar-axis order.
    pub category_scores: Vec<CategoryScoreEntry>,
}

impl Profile {
    fn build(seed: &ProfileSeed, dataset: &ReferenceDataset, rules: &ScoringRuleTable) -> Self {
        let trial_data = initial_distribution(seed, dataset);
        let demographic =
            PatientDemographic::from_details(&seed.profile_details, seed.demographics.as_ref());

        let category_scores = Category::SCORED
            .into_iter()
            .map(|category| {
                let rule = rule_for(rules, &seed.id, category);
                score_entry(&trial_data, category, &rule)
            })
            .collect();

        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            trial_data,
            demographic,
            category_scores,
        }
    }

    pub fn score_entry(&self, category: Category) -> Option<&CategoryScoreEntry> {
        self.category_scores
            .iter()
            .find(|entry| entry.name == category)
    }

    pub fn current_score(&self, category: Category) -> Option<f64> {
        self.score_entry(category).map(|entry| entry.current_score)
    }

    pub fn total_items(&self) -> usize {
        self.trial_data.total_items()
    }

    pub fn radar(&self) -> RadarChartView {
        RadarChartView {
            profile_id: self.id.clone(),
            axes: self
                .category_scores
                .iter()
                .map(|entry| RadarAxis {
                    category: entry.name,
                    score: entry.current_score,
                    level: entry.multiplier_level,
                })
                .collect(),
        }
    }

    fn recompute(&mut self, category: Category, rule: &CategoryRule) {
        let fresh = score_entry(&self.trial_data, category, rule);
        match self
            .category_scores
            .iter_mut()
            .find(|entry| entry.name == category)
        {
            Some(entry) => *entry = fresh,
            None => self.category_scores.push(fresh),
        }
    }
}

fn rule_for(rules: &ScoringRuleTable, profile: &ProfileId, category: Category) -> CategoryRule {
    rules.rule(profile, category).unwrap_or_else(|| {
        warn!(%profile, %category, "no scoring rule; category scores zero");
        CategoryRule::NEUTRAL
    })
}

fn score_entry(data: &TrialData, category: Category, rule: &CategoryRule) -> CategoryScoreEntry {
    let members = data.items(Some(category));
    CategoryScoreEntry {
        name: category,
        questions: members.iter().map(|item| item.id.clone()).collect(),
        current_score: category_score(members, rule),
        multiplier_level: rule.level,
    }
}

/// Why a move left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredMove {
    UnknownProfile,
    UnknownItem,
}

/// Result of [`ProfileStore::move_item`]. Moves never fail loudly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveOutcome {
    Applied {
        #[serde(with = "placement")]
        from: Option<Category>,
        #[serde(with = "placement")]
        to: Option<Category>,
    },
    Ignored {
        reason: IgnoredMove,
    },
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }
}

/// Owns every profile's working state and derived scores.
///
/// All mutations run to completion before returning; callers that share the
/// store across tasks wrap it in a lock (see `DashboardService`).
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dataset: ReferenceDataset,
    rules: ScoringRuleTable,
    profiles: Vec<Profile>,
    current_profile_id: ProfileId,
    last_data_change: i64,
}

impl ProfileStore {
    pub fn new(
        dataset: ReferenceDataset,
        rules: ScoringRuleTable,
    ) -> Result<Self, ScoringTableError> {
        rules.validate_against(&dataset)?;

        let profiles: Vec<Profile> = dataset
            .profiles()
            .iter()
            .map(|seed| Profile::build(seed, &dataset, &rules))
            .collect();
        // Dataset loading rejects empty profile lists.
        let current_profile_id = profiles[0].id.clone();

        info!(
            profiles = profiles.len(),
            questions = dataset.questions().len(),
            "profile store initialised"
        );

        Ok(Self {
            dataset,
            rules,
            profiles,
            current_profile_id,
            last_data_change: Utc::now().timestamp_millis(),
        })
    }

    /// Builds the store from the embedded reference data or the configured
    /// overrides, then selects the configured default profile.
    pub fn load(config: &DashboardConfig) -> Result<Self, AppError> {
        let dataset = match &config.dataset_path {
            Some(path) => ReferenceDataset::from_path(path)?,
            None => ReferenceDataset::embedded()?,
        };
        let rules = match &config.scoring_rules_path {
            Some(path) => ScoringRuleTable::from_path(path)?,
            None => ScoringRuleTable::embedded()?,
        };

        let mut store = Self::new(dataset, rules)?;
        if let Some(profile) = &config.default_profile {
            store.set_current_profile_id(ProfileId::new(profile.as_str()));
        }
        Ok(store)
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    pub fn rules(&self) -> &ScoringRuleTable {
        &self.rules
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, profile_id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.id == profile_id)
    }

    pub fn current_profile_id(&self) -> &ProfileId {
        &self.current_profile_id
    }

    /// Only ids naming a known profile are accepted.
    pub fn set_current_profile_id(&mut self, profile_id: ProfileId) -> bool {
        if self.profile(&profile_id).is_none() {
            warn!(profile = %profile_id, "ignoring switch to unknown profile");
            return false;
        }
        debug!(profile = %profile_id, "current profile switched");
        self.current_profile_id = profile_id;
        true
    }

    /// Falls back to the first profile if the current id matches nothing.
    pub fn current_profile(&self) -> &Profile {
        self.profile(&self.current_profile_id)
            .unwrap_or(&self.profiles[0])
    }

    pub fn questions_for_profile(&self, profile_id: &ProfileId) -> Vec<Item> {
        self.dataset.questions_for_profile(profile_id)
    }

    /// Milliseconds since the epoch of the last mutation to any profile.
    /// Strictly increases with every mutation.
    pub fn last_data_change_timestamp(&self) -> i64 {
        self.last_data_change
    }

    /// Moves `item` out of the placement it claims and into `target`, then
    /// re-derives the scores of the categories on both ends of the move.
    ///
    /// A stale `item.category` is tolerated: the item is taken from wherever
    /// it actually lives. Items the profile does not hold are ignored.
    pub fn move_item(
        &mut self,
        item: &Item,
        target: Option<Category>,
        profile_id: Option<&ProfileId>,
    ) -> MoveOutcome {
        let profile_id = profile_id.unwrap_or(&self.current_profile_id).clone();
        let Some(index) = self.position(&profile_id) else {
            warn!(profile = %profile_id, item = %item.id, "move ignored: unknown profile");
            return MoveOutcome::Ignored {
                reason: IgnoredMove::UnknownProfile,
            };
        };

        let rules = &self.rules;
        let profile = &mut self.profiles[index];

        let taken = match profile.trial_data.take(item.category, &item.id) {
            Some(found) => Some(found),
            None => {
                let actual = profile.trial_data.locate(&item.id);
                if let Some(actual) = actual {
                    warn!(
                        profile = %profile_id,
                        item = %item.id,
                        claimed = ?item.category,
                        actual = ?actual,
                        "drag payload placement is stale"
                    );
                    profile.trial_data.take(actual, &item.id)
                } else {
                    None
                }
            }
        };

        let Some(mut moved) = taken else {
            warn!(profile = %profile_id, item = %item.id, "move ignored: item not in profile");
            return MoveOutcome::Ignored {
                reason: IgnoredMove::UnknownItem,
            };
        };

        let from = moved.category;
        moved.category = target;
        profile.trial_data.insert(moved);
        debug_assert_eq!(profile.trial_data.occurrences(&item.id), 1);

        let mut touched: Vec<Category> = [from, target]
            .into_iter()
            .flatten()
            .filter(|category| category.is_scored())
            .collect();
        touched.dedup();
        for category in touched {
            let rule = rule_for(rules, &profile_id, category);
            profile.recompute(category, &rule);
        }

        debug!(
            profile = %profile_id,
            item = %item.id,
            from = ?from,
            to = ?target,
            "item moved"
        );

        self.touch();
        MoveOutcome::Applied { from, to: target }
    }

    /// Rebuilds the profile from the reference dataset as if newly
    /// constructed. Other profiles are untouched.
    pub fn reset_profile(&mut self, profile_id: Option<&ProfileId>) -> bool {
        let profile_id = profile_id.unwrap_or(&self.current_profile_id).clone();
        let (Some(index), Some(seed)) = (
            self.position(&profile_id),
            self.dataset.profile_seed(&profile_id),
        ) else {
            warn!(profile = %profile_id, "reset ignored: unknown profile");
            return false;
        };

        self.profiles[index] = Profile::build(seed, &self.dataset, &self.rules);
        info!(profile = %profile_id, "profile reset to initial distribution");
        self.touch();
        true
    }

    /// Shallow-merges `update` into the profile's demographic record and
    /// returns the merged record.
    pub fn update_patient_demographic(
        &mut self,
        update: DemographicUpdate,
        profile_id: Option<&ProfileId>,
    ) -> Option<&PatientDemographic> {
        let profile_id = profile_id.unwrap_or(&self.current_profile_id).clone();
        let Some(index) = self.position(&profile_id) else {
            warn!(profile = %profile_id, "demographic update ignored: unknown profile");
            return None;
        };

        let applied = self.profiles[index].demographic.merge(update);
        debug!(profile = %profile_id, fields = applied, "demographics updated");
        if applied > 0 {
            self.touch();
        }
        Some(&self.profiles[index].demographic)
    }

    fn position(&self, profile_id: &ProfileId) -> Option<usize> {
        self.profiles
            .iter()
            .position(|profile| &profile.id == profile_id)
    }

    fn touch(&mut self) {
        let now = Utc::now().timestamp_millis();
        self.last_data_change = now.max(self.last_data_change + 1);
    }
}
