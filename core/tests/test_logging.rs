#[cfg(test)]
mod logging_tests {
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration as StdDuration;

    use tracing_subscriber::fmt::MakeWriter;

    use eta_core::baseline::BaselineTable;
    use eta_core::constants::LOG_PREFIX;
    use eta_core::duration::Duration;
    use eta_core::estimator::Estimator;
    use eta_core::monitor::Monitor;
    use eta_core::stage::Stage;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` under an INFO subscriber and return everything it logged.
    fn captured<F: FnOnce()>(f: F) -> String {
        let sink = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn table() -> BaselineTable {
        BaselineTable::new()
            .with(Stage::Start, Duration::from_seconds(5))
            .with(Stage::FindFeatures, Duration::from_seconds(5))
            .with(Stage::Compose, Duration::from_seconds(5))
    }

    #[test]
    fn one_estimate_line_per_change_while_logging() {
        let est = Estimator::builder().baselines(table()).log_enabled(true).build();
        let out = captured(|| {
            est.change_stage(Stage::FindFeatures);
            est.update_progress(0.5);
        });

        let lines: Vec<&str> = out.lines().filter(|l| l.contains(LOG_PREFIX)).collect();
        assert_eq!(lines.len(), 2, "{out}");
        assert!(lines[0].ends_with("Estimated time remaining: 00:00:10.000"), "{}", lines[0]);
        assert!(lines[1].ends_with("Estimated time remaining: 00:00:07.500"), "{}", lines[1]);
    }

    #[test]
    fn silent_while_logging_is_off() {
        let est = Estimator::builder().baselines(table()).build();
        let out = captured(|| {
            est.change_stage(Stage::FindFeatures);
            est.update_progress(0.5);
            est.enable_log();
            est.disable_log();
            est.change_stage(Stage::Compose);
        });
        assert!(!out.contains(LOG_PREFIX), "{out}");
    }

    #[test]
    fn monitor_logs_the_finished_stage() {
        let est = Estimator::builder().baselines(table()).build();
        let mut mon = Monitor::with_flags(est, true, true);
        let out = captured(|| {
            mon.change_stage(Stage::Start);
            thread::sleep(StdDuration::from_millis(5));
            mon.change_stage(Stage::FindFeatures);
        });

        let finished: Vec<&str> = out.lines().filter(|l| l.contains(" finished in ")).collect();
        assert_eq!(finished.len(), 1, "{out}");
        assert!(finished[0].contains("Start finished in 00:00:00."), "{}", finished[0]);
        assert!(!out.contains(LOG_PREFIX));
    }

    #[test]
    fn monitor_without_logging_is_silent() {
        let est = Estimator::builder().baselines(table()).build();
        let mut mon = Monitor::new(est);
        let out = captured(|| {
            mon.change_stage(Stage::Start);
            mon.change_stage(Stage::FindFeatures);
        });
        assert!(!out.contains(" finished in "), "{out}");
    }
}
