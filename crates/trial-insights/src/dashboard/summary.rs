use std::collections::HashMap;

use serde::Serialize;

use super::catalog::ReferenceDataset;
use super::domain::{Category, CategoryScoreEntry, ProfileId};
use super::store::Profile;

const HEADLINE_VARIANTS: usize = 3;

/// Canned "AI" narrative for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeSummary {
    pub profile_id: ProfileId,
    pub headline: String,
    pub variant: usize,
    pub observations: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Template renderer that remembers, per profile, which headline variant it
/// used last so consecutive summaries read differently.
#[derive(Debug, Default)]
pub struct SummaryGenerator {
    last_variant: HashMap<ProfileId, usize>,
}

impl SummaryGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, profile: &Profile, dataset: &ReferenceDataset) -> NarrativeSummary {
        let variant = match self.last_variant.get(&profile.id) {
            Some(previous) => (previous + 1) % HEADLINE_VARIANTS,
            None => 0,
        };
        self.last_variant.insert(profile.id.clone(), variant);

        let dominant = dominant_category(&profile.category_scores);
        let headline = match dominant {
            Some(entry) => headline(variant, &profile.name, entry),
            None => format!(
                "No insight currently drives trial complexity for {}; drag insights into a category to begin.",
                profile.name
            ),
        };

        let mut observations: Vec<String> = profile
            .category_scores
            .iter()
            .map(|entry| {
                let ids: Vec<&str> = entry.questions.iter().map(String::as_str).collect();
                let average = dataset.calculate_average_score(ids.as_slice());
                format!(
                    "{}: {:.1}/10 with a {} multiplier, {} insight{} averaging {:.1} points",
                    entry.name,
                    entry.current_score,
                    entry.multiplier_level.label(),
                    ids.len(),
                    if ids.len() == 1 { "" } else { "s" },
                    average
                )
            })
            .collect();

        let demographic = &profile.demographic;
        observations.push(format!(
            "Cohort median age {} with {:.0}% expected compliance",
            demographic.age, demographic.compliance
        ));

        let available = profile.trial_data.available.len();
        if available > 0 {
            observations.push(format!(
                "{} insight{} still waiting to be categorised",
                available,
                if available == 1 { " is" } else { "s are" }
            ));
        }

        let mut recommendations = Vec::new();
        if let Some(entry) = dominant {
            recommendations.push(recommendation(entry.name).to_string());
        }
        if demographic.compliance < 80.0 {
            recommendations.push(
                "Plan reminder outreach; expected compliance is below 80%".to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations
                .push("Maintain the current protocol design and monitor enrolment".to_string());
        }

        NarrativeSummary {
            profile_id: profile.id.clone(),
            headline,
            variant,
            observations,
            recommendations,
        }
    }
}

/// Highest scoring category; ties go to the earlier radar axis. `None` when
/// every category scores zero.
fn dominant_category(entries: &[CategoryScoreEntry]) -> Option<&CategoryScoreEntry> {
    entries
        .iter()
        .filter(|entry| entry.current_score > 0.0)
        .fold(None, |best: Option<&CategoryScoreEntry>, entry| match best {
            Some(current) if current.current_score >= entry.current_score => Some(current),
            _ => Some(entry),
        })
}

fn headline(variant: usize, profile_name: &str, entry: &CategoryScoreEntry) -> String {
    match variant {
        0 => format!(
            "{} is the dominant driver of trial complexity for {} ({:.1}/10).",
            entry.name, profile_name, entry.current_score
        ),
        1 => format!(
            "For {}, {} stands out at {:.1}/10 and should shape protocol design.",
            profile_name, entry.name, entry.current_score
        ),
        _ => format!(
            "Insight analysis for {} points to {} as the leading concern ({:.1}/10).",
            profile_name, entry.name, entry.current_score
        ),
    }
}

fn recommendation(category: Category) -> &'static str {
    match category {
        Category::LogisticsChallenge => {
            "Offer travel reimbursement and flexible or remote visit scheduling"
        }
        Category::Motivation => {
            "Emphasise treatment access and community benefit in recruitment materials"
        }
        Category::HealthcareEngagement => {
            "Coordinate enrolment through primary care and existing specialist teams"
        }
        Category::QualityOfLife => {
            "Minimise visit burden and add symptom-management support to the protocol"
        }
        Category::Uncategorized => "Review uncategorised insights with the study team",
    }
}
