use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

/// Fixed trial-design ranges served to the dashboard. No inputs, no state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialParameters {
    pub participant_age: ParameterRange,
    pub body_mass_index: ParameterRange,
    pub visit_frequency: ParameterRange,
    pub study_duration: ParameterRange,
    pub travel_distance: ParameterRange,
    pub expected_compliance: ParameterRange,
    pub phases: Vec<&'static str>,
}

pub fn trial_parameters() -> TrialParameters {
    TrialParameters {
        participant_age: ParameterRange {
            min: 18.0,
            max: 75.0,
            unit: "years",
        },
        body_mass_index: ParameterRange {
            min: 18.5,
            max: 35.0,
            unit: "kg/m2",
        },
        visit_frequency: ParameterRange {
            min: 1.0,
            max: 8.0,
            unit: "visits/month",
        },
        study_duration: ParameterRange {
            min: 4.0,
            max: 104.0,
            unit: "weeks",
        },
        travel_distance: ParameterRange {
            min: 0.0,
            max: 150.0,
            unit: "miles",
        },
        expected_compliance: ParameterRange {
            min: 60.0,
            max: 100.0,
            unit: "percent",
        },
        phases: vec!["Phase I", "Phase II", "Phase III"],
    }
}
