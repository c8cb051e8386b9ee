use std::collections::HashSet;

use tracing::debug;

use super::catalog::{ProfileSeed, ReferenceDataset};
use super::domain::{Category, TrialData};

/// Builds a profile's initial buckets: the seed's predefined layout when it
/// has one, otherwise a balanced round-robin over the scored categories.
pub(crate) fn initial_distribution(seed: &ProfileSeed, dataset: &ReferenceDataset) -> TrialData {
    if seed.categories.is_empty() {
        round_robin(seed, dataset)
    } else {
        predefined(seed, dataset)
    }
}

/// Seed placements were checked against each question's allowed categories
/// when the dataset loaded.
fn predefined(seed: &ProfileSeed, dataset: &ReferenceDataset) -> TrialData {
    let mut data = TrialData::default();
    let mut placed = HashSet::new();

    for (category, question_ids) in seed.predefined() {
        for question_id in question_ids {
            data.insert(dataset.item_for(question_id, Some(category)));
            placed.insert(question_id.as_str());
        }
    }

    for item in dataset.questions_for_profile(&seed.id) {
        if !placed.contains(item.id.as_str()) {
            data.insert(item);
        }
    }

    data
}

/// Each question goes to the least populated scored category it is allowed
/// in, ties resolved in radar-axis order. No scored category may hold a
/// second item while another allowed one is still empty.
fn round_robin(seed: &ProfileSeed, dataset: &ReferenceDataset) -> TrialData {
    let mut data = TrialData::default();

    for mut item in dataset.questions_for_profile(&seed.id) {
        let target = Category::SCORED
            .into_iter()
            .filter(|category| dataset.can_question_be_in_category(&item.id, *category))
            .min_by_key(|category| data.items(Some(*category)).len());

        let category = match target {
            Some(category) => category,
            None => {
                debug!(
                    profile = %seed.id,
                    question = %item.id,
                    "no scored category accepts question; forcing into Uncategorized"
                );
                Category::Uncategorized
            }
        };

        item.category = Some(category);
        data.insert(item);
    }

    data
}
