//! End-to-end checks of the profile store on the bundled reference data.
//!
//! Scenarios go through the public store API only, the way the dashboard
//! drives it: pick up an item, drop it somewhere, read back the radar.

mod common {
    use trial_insights::dashboard::{
        Category, Item, ProfileId, ProfileStore, ReferenceDataset, ScoringRuleTable,
    };

    pub(super) const ONCOLOGY: &str = "oncology-urban";
    pub(super) const CARDIO: &str = "cardio-rural";
    pub(super) const PEDIATRIC: &str = "pediatric-caregiver";

    pub(super) fn bundled_store() -> ProfileStore {
        let dataset = ReferenceDataset::embedded().expect("bundled dataset parses");
        let rules = ScoringRuleTable::embedded().expect("bundled rules parse");
        ProfileStore::new(dataset, rules).expect("bundled store builds")
    }

    pub(super) fn id(value: &str) -> ProfileId {
        ProfileId::new(value)
    }

    pub(super) fn score(store: &ProfileStore, profile: &str, category: Category) -> f64 {
        store
            .profile(&id(profile))
            .and_then(|profile| profile.current_score(category))
            .expect("score present")
    }

    pub(super) fn ids_in(store: &ProfileStore, profile: &str, category: Category) -> Vec<String> {
        store
            .profile(&id(profile))
            .expect("profile present")
            .trial_data
            .items(Some(category))
            .iter()
            .map(|item| item.id.clone())
            .collect()
    }

    pub(super) fn all_items(store: &ProfileStore, profile: &str) -> Vec<Item> {
        let profile = store.profile(&id(profile)).expect("profile present");
        let mut items = profile.trial_data.available.clone();
        for category in Category::ALL {
            items.extend(profile.trial_data.items(Some(category)).iter().cloned());
        }
        items
    }

    pub(super) fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    pub(super) const TARGETS: [Option<Category>; 6] = [
        None,
        Some(Category::LogisticsChallenge),
        Some(Category::Motivation),
        Some(Category::HealthcareEngagement),
        Some(Category::QualityOfLife),
        Some(Category::Uncategorized),
    ];

    /// Applies `(item, target)` index pairs to `profile`, picking the item
    /// from its current working copy so payloads are never stale.
    pub(super) fn apply_moves(store: &mut ProfileStore, profile: &str, moves: &[(usize, usize)]) {
        for &(item_index, target_index) in moves {
            let items = all_items(store, profile);
            let payload = items[item_index % items.len()].clone();
            let target = TARGETS[target_index % TARGETS.len()];
            store.move_item(&payload, target, Some(&id(profile)));
        }
    }
}

mod scenarios {
    use super::common::*;
    use trial_insights::dashboard::Category;

    #[test]
    fn bundled_profiles_start_with_expected_scores() {
        let store = bundled_store();
        let expected = [
            (ONCOLOGY, [6.4, 4.2, 7.0, 3.0]),
            (CARDIO, [3.5, 2.7, 3.0, 9.0]),
            (PEDIATRIC, [5.5, 2.8, 7.2, 7.2]),
        ];

        for (profile, scores) in expected {
            for (category, expected) in Category::SCORED.into_iter().zip(scores) {
                assert_close(score(&store, profile, category), expected);
            }
        }
        assert_eq!(store.current_profile().id, id(ONCOLOGY));
    }

    #[test]
    fn profile_without_layout_is_balanced_round_robin() {
        let store = bundled_store();

        assert_eq!(
            ids_in(&store, PEDIATRIC, Category::HealthcareEngagement),
            vec!["work-absence", "treatment-access", "digital-literacy"]
        );
        assert_eq!(
            ids_in(&store, PEDIATRIC, Category::Motivation),
            vec!["altruism", "family-support"]
        );
        assert_eq!(
            ids_in(&store, PEDIATRIC, Category::QualityOfLife),
            vec!["childcare", "portal-usage", "fatigue"]
        );
        assert_eq!(
            ids_in(&store, PEDIATRIC, Category::LogisticsChallenge),
            vec!["travel-distance", "sleep"]
        );
        let profile = store.profile(&id(PEDIATRIC)).expect("profile present");
        assert!(profile.trial_data.available.is_empty());
    }

    #[test]
    fn predefined_leftovers_wait_in_the_available_list() {
        let store = bundled_store();

        let oncology = store.profile(&id(ONCOLOGY)).expect("profile present");
        let waiting: Vec<&str> = oncology
            .trial_data
            .available
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(waiting, vec!["sleep"]);
        assert_eq!(
            ids_in(&store, ONCOLOGY, Category::Uncategorized),
            vec!["digital-literacy"]
        );

        let cardio = store.profile(&id(CARDIO)).expect("profile present");
        assert_eq!(cardio.trial_data.available.len(), 1);
        assert_eq!(cardio.trial_data.available[0].id, "portal-usage");
    }

    #[test]
    fn average_scores_come_from_the_catalog() {
        let store = bundled_store();
        let dataset = store.dataset();

        assert_close(
            dataset.calculate_average_score(&["treatment-access", "altruism"]),
            3.5,
        );
        assert_close(dataset.calculate_average_score::<&str>(&[]), 0.0);
        assert!(dataset.can_question_be_in_category("childcare", Category::QualityOfLife));
        assert!(!dataset.can_question_be_in_category("compensation", Category::QualityOfLife));
    }
}

mod properties {
    use super::common::*;
    use proptest::prelude::*;
    use trial_insights::dashboard::Category;

    const PROFILES: [&str; 3] = [ONCOLOGY, CARDIO, PEDIATRIC];

    fn move_sequence() -> impl Strategy<Value = Vec<(usize, usize)>> {
        proptest::collection::vec((0usize..64, 0usize..TARGETS.len()), 0..60)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Items are never lost or duplicated and scores stay within 0..=10.
        #[test]
        fn moves_conserve_items_and_bound_scores(
            profile_index in 0usize..PROFILES.len(),
            moves in move_sequence(),
        ) {
            let profile = PROFILES[profile_index];
            let mut store = bundled_store();
            let initial: Vec<String> = {
                let mut ids: Vec<String> =
                    all_items(&store, profile).into_iter().map(|item| item.id).collect();
                ids.sort();
                ids
            };

            for step in 0..moves.len() {
                apply_moves(&mut store, profile, &moves[step..=step]);

                let current = store.profile(&id(profile)).expect("profile present");
                let mut ids: Vec<String> =
                    all_items(&store, profile).into_iter().map(|item| item.id).collect();
                ids.sort();
                prop_assert_eq!(&ids, &initial);
                for category in Category::SCORED {
                    let value = current.current_score(category).expect("score present");
                    prop_assert!((0.0..=10.0).contains(&value), "{} scored {}", category, value);
                }
            }
        }

        /// Dropping an item where it already is changes no score or count.
        #[test]
        fn same_category_move_is_a_no_op(
            profile_index in 0usize..PROFILES.len(),
            moves in move_sequence(),
            pick in 0usize..64,
        ) {
            let profile = PROFILES[profile_index];
            let mut store = bundled_store();
            apply_moves(&mut store, profile, &moves);

            let before = store.profile(&id(profile)).cloned().expect("profile present");
            let items = all_items(&store, profile);
            let payload = items[pick % items.len()].clone();

            let outcome = store.move_item(&payload, payload.category, Some(&id(profile)));

            prop_assert!(outcome.is_applied());
            let after = store.profile(&id(profile)).expect("profile present");
            for (left, right) in after.category_scores.iter().zip(&before.category_scores) {
                prop_assert_eq!(left.name, right.name);
                prop_assert_eq!(&left.questions, &right.questions);
                prop_assert!((left.current_score - right.current_score).abs() < 1e-9);
            }
            prop_assert_eq!(after.total_items(), before.total_items());
            prop_assert_eq!(after.trial_data.occurrences(&payload.id), 1);
            prop_assert_eq!(
                after.trial_data.items(payload.category).len(),
                before.trial_data.items(payload.category).len()
            );
        }

        /// Reset reproduces the freshly constructed profile, scores bit for bit.
        #[test]
        fn reset_returns_to_the_constructed_baseline(
            profile_index in 0usize..PROFILES.len(),
            moves in move_sequence(),
        ) {
            let profile = PROFILES[profile_index];
            let fresh = bundled_store();
            let mut store = bundled_store();
            apply_moves(&mut store, profile, &moves);

            prop_assert!(store.reset_profile(Some(&id(profile))));

            let restored = store.profile(&id(profile)).expect("profile present");
            let baseline = fresh.profile(&id(profile)).expect("profile present");
            prop_assert_eq!(restored, baseline);
            for category in Category::SCORED {
                let left = restored.current_score(category).expect("score present");
                let right = baseline.current_score(category).expect("score present");
                prop_assert_eq!(left.to_bits(), right.to_bits());
            }
        }
    }
}
