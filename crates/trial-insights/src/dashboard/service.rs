use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tracing::info;

use super::demographics::{DemographicUpdate, PatientDemographic};
use super::domain::{Category, Item, ProfileId};
use super::loading::LoadingPhase;
use super::store::{MoveOutcome, Profile, ProfileStore};
use super::summary::{NarrativeSummary, SummaryGenerator};
use super::views::{CurrentProfileView, ProfileListView, ProfileListing, RadarChartView};

/// Shares one [`ProfileStore`] with concurrent request handlers.
///
/// Each operation holds the store lock for its whole mutation, so no reader
/// ever sees a half-applied move or reset.
#[derive(Debug)]
pub struct DashboardService {
    store: Mutex<ProfileStore>,
    summaries: Mutex<SummaryGenerator>,
    phase: Mutex<LoadingPhase>,
}

/// Result of a move plus the profile's radar after it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MoveReceipt {
    pub outcome: MoveOutcome,
    pub radar: Option<RadarChartView>,
    pub last_data_change_timestamp: i64,
}

impl DashboardService {
    /// Starts in the first loading phase; see [`Self::run_loading_sequence`].
    pub fn new(store: ProfileStore) -> Self {
        Self::with_phase(store, LoadingPhase::FetchingProfiles)
    }

    /// Skips the loading phases.
    pub fn ready(store: ProfileStore) -> Self {
        Self::with_phase(store, LoadingPhase::Ready)
    }

    fn with_phase(store: ProfileStore, phase: LoadingPhase) -> Self {
        Self {
            store: Mutex::new(store),
            summaries: Mutex::new(SummaryGenerator::new()),
            phase: Mutex::new(phase),
        }
    }

    fn store(&self) -> MutexGuard<'_, ProfileStore> {
        self.store.lock().expect("profile store mutex poisoned")
    }

    pub fn loading_phase(&self) -> LoadingPhase {
        *self.phase.lock().expect("loading phase mutex poisoned")
    }

    pub fn is_loading(&self) -> bool {
        self.loading_phase().is_loading()
    }

    /// Steps through the remaining loading phases, pausing `phase_duration`
    /// before each transition.
    pub async fn run_loading_sequence(&self, phase_duration: Duration) {
        loop {
            let current = self.loading_phase();
            let Some(next) = current.next() else {
                break;
            };
            tokio::time::sleep(phase_duration).await;
            *self.phase.lock().expect("loading phase mutex poisoned") = next;
            info!(phase = next.label(), "dashboard loading phase");
        }
    }

    /// Read access for callers that render directly from the store.
    pub fn with_store<T>(&self, read: impl FnOnce(&ProfileStore) -> T) -> T {
        let store = self.store();
        read(&*store)
    }

    pub fn profiles(&self) -> ProfileListView {
        let store = self.store();
        ProfileListView {
            current_profile_id: store.current_profile().id.clone(),
            profiles: store
                .profiles()
                .iter()
                .map(|profile| ProfileListing {
                    id: profile.id.clone(),
                    name: profile.name.clone(),
                })
                .collect(),
        }
    }

    pub fn current_profile(&self) -> CurrentProfileView {
        let phase = self.loading_phase();
        let store = self.store();
        CurrentProfileView {
            profile: store.current_profile().clone(),
            is_loading: phase.is_loading(),
            loading_phase: phase,
            last_data_change_timestamp: store.last_data_change_timestamp(),
        }
    }

    pub fn set_current_profile_id(&self, profile_id: ProfileId) -> bool {
        self.store().set_current_profile_id(profile_id)
    }

    pub fn profile(&self, profile_id: &ProfileId) -> Option<Profile> {
        self.store().profile(profile_id).cloned()
    }

    /// `None` when the profile does not exist.
    pub fn questions_for_profile(&self, profile_id: &ProfileId) -> Option<Vec<Item>> {
        let store = self.store();
        store.profile(profile_id)?;
        Some(store.questions_for_profile(profile_id))
    }

    pub fn radar(&self, profile_id: &ProfileId) -> Option<RadarChartView> {
        self.store().profile(profile_id).map(Profile::radar)
    }

    pub fn move_item(
        &self,
        profile_id: &ProfileId,
        item: &Item,
        target: Option<Category>,
    ) -> MoveReceipt {
        let mut store = self.store();
        let outcome = store.move_item(item, target, Some(profile_id));
        MoveReceipt {
            outcome,
            radar: store.profile(profile_id).map(Profile::radar),
            last_data_change_timestamp: store.last_data_change_timestamp(),
        }
    }

    pub fn reset_profile(&self, profile_id: &ProfileId) -> Option<Profile> {
        let mut store = self.store();
        if !store.reset_profile(Some(profile_id)) {
            return None;
        }
        store.profile(profile_id).cloned()
    }

    pub fn update_patient_demographic(
        &self,
        profile_id: &ProfileId,
        update: DemographicUpdate,
    ) -> Option<PatientDemographic> {
        self.store()
            .update_patient_demographic(update, Some(profile_id))
            .cloned()
    }

    pub fn summary(&self, profile_id: &ProfileId) -> Option<NarrativeSummary> {
        let store = self.store();
        let profile = store.profile(profile_id)?;
        let mut summaries = self.summaries.lock().expect("summary mutex poisoned");
        Some(summaries.generate(profile, store.dataset()))
    }
}
