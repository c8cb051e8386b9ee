use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cohort attributes shown next to the radar chart for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDemographic {
    pub age: u32,
    /// Origin mix, label to percentage.
    pub origin: BTreeMap<String, f64>,
    /// Role mix, label to percentage.
    pub role: BTreeMap<String, f64>,
    pub gender: String,
    pub ethnicity: String,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    /// Expected protocol compliance as a percentage.
    pub compliance: f64,
    pub medical_history: Vec<String>,
}

/// Fixed cohort facts a profile seed carries in the reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub origin: BTreeMap<String, f64>,
    pub age: u32,
    pub role: BTreeMap<String, f64>,
}

/// Partial demographic record. Absent fields are left untouched on merge.
///
/// Reference dataset seeds use the same shape to override the editable
/// defaults for a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<String>>,
}

impl DemographicUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

const UNSPECIFIED: &str = "Not specified";
const DEFAULT_WEIGHT_KG: f64 = 70.0;
const DEFAULT_HEIGHT_CM: f64 = 170.0;
const DEFAULT_COMPLIANCE_PCT: f64 = 85.0;

impl PatientDemographic {
    pub fn from_details(details: &ProfileDetails, seed: Option<&DemographicUpdate>) -> Self {
        let mut demographic = Self {
            age: details.age,
            origin: details.origin.clone(),
            role: details.role.clone(),
            gender: UNSPECIFIED.to_string(),
            ethnicity: UNSPECIFIED.to_string(),
            weight: DEFAULT_WEIGHT_KG,
            height: DEFAULT_HEIGHT_CM,
            compliance: DEFAULT_COMPLIANCE_PCT,
            medical_history: Vec::new(),
        };
        if let Some(seed) = seed {
            demographic.merge(seed.clone());
        }
        demographic
    }

    /// Shallow merge; returns how many fields were overwritten. Values are
    /// stored as given, range checks belong to whoever edits them.
    pub fn merge(&mut self, update: DemographicUpdate) -> usize {
        let DemographicUpdate {
            age,
            origin,
            role,
            gender,
            ethnicity,
            weight,
            height,
            compliance,
            medical_history,
        } = update;

        let mut applied = 0;

        if let Some(value) = age {
            self.age = value;
            applied += 1;
        }
        if let Some(value) = origin {
            self.origin = value;
            applied += 1;
        }
        if let Some(value) = role {
            self.role = value;
            applied += 1;
        }
        if let Some(value) = gender {
            self.gender = value;
            applied += 1;
        }
        if let Some(value) = ethnicity {
            self.ethnicity = value;
            applied += 1;
        }
        if let Some(value) = weight {
            self.weight = value;
            applied += 1;
        }
        if let Some(value) = height {
            self.height = value;
            applied += 1;
        }
        if let Some(value) = compliance {
            self.compliance = value;
            applied += 1;
        }
        if let Some(value) = medical_history {
            self.medical_history = value;
            applied += 1;
        }

        applied
    }
}
