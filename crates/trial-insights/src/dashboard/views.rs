use serde::Serialize;

use super::domain::{Category, MultiplierLevel, ProfileId};
use super::loading::LoadingPhase;
use super::store::Profile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub category: Category,
    pub score: f64,
    pub level: MultiplierLevel,
}

/// The four scored axes of a profile, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChartView {
    pub profile_id: ProfileId,
    pub axes: Vec<RadarAxis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileListing {
    pub id: ProfileId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileListView {
    pub current_profile_id: ProfileId,
    pub profiles: Vec<ProfileListing>,
}

/// Snapshot handed to observers polling for changes.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentProfileView {
    pub profile: Profile,
    pub is_loading: bool,
    pub loading_phase: LoadingPhase,
    pub last_data_change_timestamp: i64,
}
