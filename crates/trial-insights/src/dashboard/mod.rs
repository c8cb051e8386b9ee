//! Insight categorisation and complexity scoring for trial-design profiles.
//!
//! The reference dataset and scoring rule table are loaded once and never
//! mutated. [`ProfileStore`] owns all working state; [`DashboardService`]
//! shares it with HTTP handlers.

pub mod catalog;
pub mod demographics;
mod distribution;
pub mod domain;
pub mod loading;
pub mod parameters;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod summary;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{DatasetError, ProfileSeed, ReferenceDataset, SeedCategory};
pub use demographics::{DemographicUpdate, PatientDemographic, ProfileDetails};
pub use domain::{
    Category, CategoryParseError, CategoryScoreEntry, Item, MultiplierLevel, ProfileId, Question,
    TrialData,
};
pub use loading::LoadingPhase;
pub use parameters::{trial_parameters, TrialParameters};
pub use router::dashboard_router;
pub use scoring::{CategoryRule, ScoringRuleTable, ScoringTableError};
pub use service::{DashboardService, MoveReceipt};
pub use store::{IgnoredMove, MoveOutcome, Profile, ProfileStore};
pub use summary::{NarrativeSummary, SummaryGenerator};
pub use views::{CurrentProfileView, ProfileListView, RadarAxis, RadarChartView};
