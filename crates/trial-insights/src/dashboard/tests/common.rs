use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;

use crate::dashboard::catalog::ReferenceDataset;
use crate::dashboard::domain::{Category, Item, ProfileId};
use crate::dashboard::scoring::ScoringRuleTable;
use crate::dashboard::service::DashboardService;
use crate::dashboard::store::ProfileStore;

/// Two small profiles: `alpha` is predefined with three items waiting in the
/// available list, `beta` is distributed round-robin.
pub(super) const FIXTURE_DATASET: &str = r#"{
    "allQuestions": [
        {"id": "a", "name": "Seeking a new treatment", "score": 4, "initialProfile": ["alpha", "beta"]},
        {"id": "b", "name": "Family encourages participation", "score": 6, "initialProfile": ["alpha", "beta"]},
        {"id": "c", "name": "Strong primary care relationship", "score": 3, "initialProfile": ["beta"]},
        {"id": "d", "name": "Treatment-related fatigue", "score": 2},
        {"id": "e", "name": "Long travel distance", "score": 5, "initialProfile": ["alpha"]}
    ],
    "profiles": [
        {
            "id": "alpha",
            "name": "Alpha Cohort",
            "profile_details": {"origin": {"Urban": 100}, "age": 52, "role": {"Patient": 100}},
            "demographics": {"gender": "Female", "compliance": 88.0},
            "categories": [
                {"name": "Healthcare Engagement", "questions": ["c"]},
                {"name": "Quality of Life", "questions": ["d"]},
                {"name": "Motivation", "questions": []}
            ]
        },
        {
            "id": "beta",
            "name": "Beta Cohort",
            "profile_details": {"origin": {"Rural": 100}, "age": 61, "role": {"Caregiver": 100}},
            "categories": []
        }
    ]
}"#;

pub(super) const FIXTURE_RULES: &str = r#"{
    "alpha": {
        "Healthcare Engagement": {"add": 1.0, "remove": 0.5, "level": "Low"},
        "Motivation": {"add": 0.5, "remove": 0.25, "level": "Medium"},
        "Quality of Life": {"add": 2.0, "remove": 1.0, "level": "High"},
        "Logistics Challenge": {"add": 0.25, "remove": 0.25, "level": "Low"}
    },
    "beta": {
        "Healthcare Engagement": {"add": 1.0, "remove": 1.0, "level": "High"},
        "Motivation": {"add": 1.0, "remove": 1.0, "level": "High"},
        "Quality of Life": {"add": 1.0, "remove": 1.0, "level": "Medium"},
        "Logistics Challenge": {"add": 1.0, "remove": 1.0, "level": "Low"}
    }
}"#;

pub(super) fn alpha() -> ProfileId {
    ProfileId::new("alpha")
}

pub(super) fn beta() -> ProfileId {
    ProfileId::new("beta")
}

pub(super) fn store() -> ProfileStore {
    let dataset = ReferenceDataset::from_json(FIXTURE_DATASET).expect("fixture dataset parses");
    let rules = ScoringRuleTable::from_json(FIXTURE_RULES).expect("fixture rules parse");
    ProfileStore::new(dataset, rules).expect("fixture store builds")
}

pub(super) fn service() -> Arc<DashboardService> {
    Arc::new(DashboardService::ready(store()))
}

/// Current working copy of an item, as the presentation layer would send it.
pub(super) fn item(store: &ProfileStore, profile: &ProfileId, id: &str) -> Item {
    let profile = store.profile(profile).expect("profile present");
    let placement = profile.trial_data.locate(id).expect("item present");
    profile
        .trial_data
        .items(placement)
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .expect("item in its bucket")
}

pub(super) fn score(store: &ProfileStore, profile: &ProfileId, category: Category) -> f64 {
    store
        .profile(profile)
        .and_then(|profile| profile.current_score(category))
        .expect("score entry present")
}

pub(super) fn members(store: &ProfileStore, profile: &ProfileId, category: Category) -> usize {
    store
        .profile(profile)
        .map(|profile| profile.trial_data.items(Some(category)).len())
        .expect("profile present")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
