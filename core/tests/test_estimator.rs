#[cfg(test)]
mod estimator_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;
    use eta_core::baseline::{builtin_table, BaselineTable, ProfileKind};
    use eta_core::duration::Duration;
    use eta_core::estimator::Estimator;
    use eta_core::stage::Stage;
    use eta_core::telemetry::StageTimes;

    fn three_stage_table() -> BaselineTable {
        BaselineTable::new()
            .with(Stage::Start, Duration::from_seconds(5))
            .with(Stage::FindFeatures, Duration::from_seconds(5))
            .with(Stage::Compose, Duration::from_seconds(5))
    }

    fn estimator() -> Estimator {
        Estimator::builder().baselines(three_stage_table()).build()
    }

    fn times(entries: &[(Stage, i64)]) -> StageTimes {
        entries
            .iter()
            .map(|(stage, secs)| (*stage, Duration::from_seconds(*secs)))
            .collect()
    }

    #[test]
    fn fresh_estimator_reports_baseline_total() {
        let est = estimator();
        assert_eq!(est.current_stage(), Stage::Start);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(15));
        assert_eq!(est.estimated_time_total(), Duration::from_seconds(15));
        assert_eq!(est.elapsed_to_estimate_ratio(), 1.0);
    }

    #[test]
    fn stage_change_without_supplier_treats_completed_stages_as_exact() {
        let est = estimator();
        est.change_stage(Stage::FindFeatures);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(10));

        est.update_progress(0.5);
        assert_eq!(est.estimated_time_remaining(), Duration::from_milliseconds(7500));
        assert_eq!(est.elapsed_to_estimate_ratios().get(&Stage::Start), Some(&1.0));
    }

    #[test]
    fn supplied_times_scale_the_remaining_baseline() {
        let est = estimator();
        est.set_actual_times_supplier(|| times(&[(Stage::FindFeatures, 10)]));
        est.change_stage(Stage::Compose);

        assert_eq!(est.elapsed_to_estimate_ratio(), 2.0);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(10));
    }

    #[test]
    fn ratio_is_the_mean_over_completed_stages() {
        let est = estimator();
        est.set_actual_times_supplier(|| times(&[(Stage::Start, 10), (Stage::FindFeatures, 5)]));
        est.change_stage(Stage::Compose);

        let ratios = est.elapsed_to_estimate_ratios();
        assert_eq!(ratios[&Stage::Start], 2.0);
        assert_eq!(ratios[&Stage::FindFeatures], 1.0);
        assert_eq!(est.elapsed_to_estimate_ratio(), 1.5);
        assert_eq!(est.estimated_time_remaining(), Duration::from_milliseconds(7500));
    }

    #[test]
    fn empty_supplier_falls_back_to_baseline_total() {
        let est = estimator();
        est.set_actual_times_supplier(StageTimes::new);
        est.change_stage(Stage::Compose);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(15));

        est.clear_actual_times_supplier();
        assert!(!est.has_actual_times_supplier());
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(5));
    }

    #[test]
    fn supplied_stage_missing_from_baseline_is_neutral() {
        let est = estimator();
        est.set_actual_times_supplier(|| times(&[(Stage::UndistortImages, 40), (Stage::Start, 15)]));
        est.change_stage(Stage::Compose);
        assert_eq!(est.elapsed_to_estimate_ratios()[&Stage::UndistortImages], 1.0);
        assert_eq!(est.elapsed_to_estimate_ratio(), 2.0);
    }

    #[test]
    fn progress_is_clamped() {
        let est = estimator();
        est.change_stage(Stage::FindFeatures);
        est.update_progress(1.5);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(5));
        est.update_progress(-1.0);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(10));
        est.update_progress(f64::NAN);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(10));
    }

    #[test]
    fn stage_change_resets_progress() {
        let est = estimator();
        est.change_stage(Stage::FindFeatures);
        est.update_progress(0.9);
        est.change_stage(Stage::Compose);
        assert_eq!(est.progress(), 0.0);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(5));
    }

    #[test]
    fn manual_estimate_wins_while_positive() {
        let est = estimator();
        est.set_manual_estimate("00:02:00.000").unwrap();
        assert_eq!(est.estimated_time_remaining(), Duration::from_minutes(2));
        est.change_stage(Stage::Compose);
        assert_eq!(est.estimated_time_remaining(), Duration::from_minutes(2));

        est.set_manual_estimate_duration(Duration::ZERO);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(5));

        est.set_manual_estimate("00:00:30").unwrap();
        est.clear_manual_estimate();
        assert_eq!(est.manual_estimate(), None);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(5));
    }

    #[test]
    fn malformed_manual_estimate_is_rejected_and_ignored() {
        let est = estimator();
        est.set_manual_estimate("00:01:00").unwrap();
        assert!(est.set_manual_estimate("1 minute").is_err());
        assert_eq!(est.manual_estimate(), Some(Duration::from_minutes(1)));
    }

    #[test]
    fn disabled_estimator_ignores_mutations() {
        let est = Estimator::builder().baselines(three_stage_table()).enabled(false).build();
        est.change_stage(Stage::Compose);
        est.update_progress(0.5);
        est.set_manual_estimate("00:10:00").unwrap();

        assert_eq!(est.current_stage(), Stage::Start);
        assert_eq!(est.manual_estimate(), None);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(15));
    }

    #[test]
    fn disable_freezes_the_last_estimate() {
        let est = estimator();
        est.change_stage(Stage::FindFeatures);
        est.disable();
        assert!(!est.is_enabled());
        assert!(!est.is_log_enabled());

        est.change_stage(Stage::Compose);
        assert_eq!(est.current_stage(), Stage::FindFeatures);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(10));

        est.enable();
        est.change_stage(Stage::Compose);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(5));
    }

    #[test]
    fn enabling_log_enables_the_estimator() {
        let est = Estimator::builder().enabled(false).build();
        est.enable_log();
        assert!(est.is_enabled());
        assert!(est.is_log_enabled());
        est.disable_log();
        assert!(est.is_enabled());
        assert!(!est.is_log_enabled());
    }

    #[test]
    fn observers_fire_on_every_applied_mutation() {
        let est = estimator();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        est.add_observer(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        est.change_stage(Stage::FindFeatures);
        est.update_progress(0.25);
        est.set_manual_estimate_duration(Duration::from_seconds(3));
        est.clear_manual_estimate();
        est.record_stage_time(Stage::FindFeatures, Duration::from_seconds(1));
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        est.disable();
        est.update_progress(0.5);
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        est.clear_observers();
        est.enable();
        est.update_progress(0.75);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn observers_can_query_the_estimator() {
        let est = estimator();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (handle, sink) = (est.clone(), Arc::clone(&seen));
        est.add_observer(move || {
            sink.lock().unwrap().push(handle.estimated_time_remaining());
        });

        est.change_stage(Stage::FindFeatures);
        est.update_progress(0.5);
        est.change_stage(Stage::Compose);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Duration::from_seconds(10),
                Duration::from_milliseconds(7500),
                Duration::from_seconds(5),
            ]
        );
    }

    #[test]
    fn profile_change_applies_at_next_stage() {
        let est = Estimator::new(ProfileKind::Unknown);
        est.set_profile(ProfileKind::Fisheye);
        assert_eq!(est.profile(), ProfileKind::Fisheye);
        assert_eq!(est.baselines(), builtin_table(ProfileKind::Unknown));

        est.change_stage(Stage::UndistortImages);
        assert_eq!(est.baselines(), builtin_table(ProfileKind::Fisheye));
        assert_eq!(est.estimated_time_total(), Duration::from_milliseconds(281_500));
    }

    #[test]
    fn selector_closure_is_consulted_on_stage_change() {
        let picks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&picks);
        let est = Estimator::builder()
            .selector(move |kind: ProfileKind| {
                counter.fetch_add(1, Ordering::SeqCst);
                builtin_table(kind)
            })
            .build();
        est.change_stage(Stage::UndistortImages);
        est.change_stage(Stage::FindFeatures);
        assert_eq!(picks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backward_transition_is_applied() {
        let est = estimator();
        est.change_stage(Stage::Compose);
        est.change_stage(Stage::FindFeatures);
        assert_eq!(est.current_stage(), Stage::FindFeatures);
        assert_eq!(est.estimated_time_remaining(), Duration::from_seconds(10));
    }

    #[test]
    fn stage_times_passed_with_transition_are_kept() {
        let est = estimator();
        est.change_stage_with_times(Stage::FindFeatures, &times(&[(Stage::Start, 7)]));
        est.change_stage_with_times(Stage::Compose, &times(&[(Stage::Start, 9), (Stage::FindFeatures, 4)]));
        let recorded = est.recorded_times();
        assert_eq!(recorded.get(Stage::Start), Some(Duration::from_seconds(7)));
        assert_eq!(recorded.get(Stage::FindFeatures), Some(Duration::from_seconds(4)));
    }

    #[test]
    fn snapshot_describes_one_moment() {
        let est = estimator();
        est.set_actual_times_supplier(|| times(&[(Stage::Start, 10)]));
        est.change_stage(Stage::FindFeatures);
        est.update_progress(0.5);

        let snap = est.snapshot();
        assert_eq!(snap.stage, Stage::FindFeatures);
        assert_eq!(snap.progress, 0.5);
        assert_eq!(snap.ratio, 2.0);
        assert_eq!(snap.remaining, Duration::from_seconds(15));
        assert_eq!(snap.total, Duration::from_seconds(15));
        assert_eq!(snap.completed.get(Stage::Start), Some(Duration::from_seconds(10)));
        assert_eq!(snap.remaining_fraction(), 1.0);
        assert!(snap.summary().contains("stage=FindFeatures"));
        assert!(snap.to_json().unwrap().contains("\"remaining\":\"00:00:15.000\""));
    }

    #[test]
    fn clones_share_state() {
        let est = estimator();
        let other = est.clone();
        other.change_stage(Stage::Compose);
        assert_eq!(est.current_stage(), Stage::Compose);
    }

    proptest! {
        #[test]
        fn prop_remaining_never_grows_with_progress(a in 0.0f64..=1.0, b in 0.0f64..=1.0, actual in 1i64..100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let est = estimator();
            est.set_actual_times_supplier(move || times(&[(Stage::Start, actual)]));
            est.change_stage(Stage::FindFeatures);

            est.update_progress(lo);
            let before = est.estimated_time_remaining();
            est.update_progress(hi);
            let after = est.estimated_time_remaining();
            prop_assert!(after <= before);
        }

        #[test]
        fn prop_uniform_slowdown_scales_remaining(k in 0.1f64..10.0) {
            let actual = Duration::from_seconds(5) * k;
            let est = estimator();
            est.set_actual_times_supplier(move || {
                [(Stage::Start, actual), (Stage::FindFeatures, actual)].into_iter().collect()
            });
            est.change_stage(Stage::Compose);

            let remaining = est.estimated_time_remaining().as_millis();
            let expected = actual.as_millis();
            prop_assert!((remaining - expected).abs() <= 1, "remaining {} expected {}", remaining, expected);
            if k < 0.99 {
                prop_assert!(remaining < 5_000);
            }
            if k > 1.01 {
                prop_assert!(remaining > 5_000);
            }
        }

        #[test]
        fn prop_remaining_drops_by_each_completed_baseline(
            stages in proptest::sample::subsequence(Stage::ALL.to_vec(), 1..=Stage::COUNT),
            profile in proptest::sample::select(ProfileKind::ALL.to_vec()),
        ) {
            let table = builtin_table(profile);
            let est = Estimator::new(profile);
            let mut previous = est.estimated_time_remaining();
            for stage in stages {
                est.change_stage(stage);
                let remaining = est.estimated_time_remaining();
                let expected: Duration = table.iter().filter(|(s, _)| *s >= stage).map(|(_, d)| d).sum();
                prop_assert_eq!(remaining, expected);
                prop_assert!(remaining <= previous);
                previous = remaining;
            }
        }
    }
}
