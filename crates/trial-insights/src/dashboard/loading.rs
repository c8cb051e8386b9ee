use serde::Serialize;

/// Simulated start-up phases shown before the dashboard becomes visible.
/// They gate visibility only; the store is ready before the first phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPhase {
    FetchingProfiles,
    ScoringCategories,
    PreparingSummary,
    Ready,
}

impl LoadingPhase {
    pub const SEQUENCE: [LoadingPhase; 4] = [
        LoadingPhase::FetchingProfiles,
        LoadingPhase::ScoringCategories,
        LoadingPhase::PreparingSummary,
        LoadingPhase::Ready,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LoadingPhase::FetchingProfiles => "Fetching patient profiles",
            LoadingPhase::ScoringCategories => "Scoring complexity categories",
            LoadingPhase::PreparingSummary => "Preparing insight summary",
            LoadingPhase::Ready => "Ready",
        }
    }

    pub fn next(self) -> Option<LoadingPhase> {
        match self {
            LoadingPhase::FetchingProfiles => Some(LoadingPhase::ScoringCategories),
            LoadingPhase::ScoringCategories => Some(LoadingPhase::PreparingSummary),
            LoadingPhase::PreparingSummary => Some(LoadingPhase::Ready),
            LoadingPhase::Ready => None,
        }
    }

    pub fn is_loading(self) -> bool {
        self != LoadingPhase::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_in_sequence_and_stop_at_ready() {
        let mut phase = LoadingPhase::FetchingProfiles;
        let mut visited = vec![phase];
        while let Some(next) = phase.next() {
            phase = next;
            visited.push(phase);
        }
        assert_eq!(visited, LoadingPhase::SEQUENCE.to_vec());
        assert!(!phase.is_loading());
    }
}
