use std::sync::Arc;
use std::time::{Duration, Instant};
use u_anytime::anytime::{
    AlgorithmState, AlternatingSeries, AnytimeAlgorithm, AnytimeProblem, OrderingConfig,
    OrderingProblem, SeriesConfig, SeriesRefiner, Solution, SolutionSlot, StopOutcome,
};
use u_anytime::error::{AlgorithmError, MetaError};
use u_anytime::meta::{EventLog, EventSink, MetaConfig, MetaReasoner};
use u_anytime::predict::{LinearPredictor, MovingAveragePredictor, SaturationPredictor};
use u_anytime::stopping::{
    CompositeStopping, QualityThresholdStopping, StopReason, TimeoutStopping, UtilityStopping,
};

const POLL: Duration = Duration::from_millis(10);

fn reasoner() -> (MetaReasoner, Arc<EventLog>) {
    let log = Arc::new(EventLog::new());
    let reasoner = MetaReasoner::new(MetaConfig::default().with_poll_interval(POLL))
        .unwrap()
        .with_sink(Arc::clone(&log) as Arc<dyn EventSink>);
    (reasoner, log)
}

fn series(delay: Duration) -> SeriesRefiner {
    SeriesRefiner::new(SeriesConfig::default().with_step_delay(delay)).unwrap()
}

#[test]
fn test_zero_timeout_returns_initial_quality() {
    let mut expected = series(Duration::ZERO);
    let initial_quality = expected.initial_solution().unwrap().quality();

    let (reasoner, _) = reasoner();
    let mut algorithm = AnytimeAlgorithm::new(series(Duration::from_millis(2)));
    let begun = Instant::now();
    let outcome = reasoner
        .run_control_loop(
            &mut algorithm,
            &LinearPredictor::default(),
            &TimeoutStopping::from_secs_f64(0.0).unwrap(),
        )
        .unwrap();

    assert!(begun.elapsed() < POLL + Duration::from_millis(50));
    assert_eq!(outcome.solution.quality(), initial_quality);
    assert_eq!(outcome.solution.data().terms, 10);
    assert!(!algorithm.running());
}

#[test]
fn test_series_reaches_quality_target() {
    let (reasoner, log) = reasoner();
    let mut algorithm = AnytimeAlgorithm::new(series(Duration::from_millis(2)));
    let outcome = reasoner
        .run_control_loop(
            &mut algorithm,
            &SaturationPredictor::default(),
            &QualityThresholdStopping::new(0.9).unwrap(),
        )
        .unwrap();

    assert!(matches!(outcome.reason, StopReason::QualityReached { .. }));
    assert!(outcome.solution.quality() >= 0.9);
    assert!(outcome.solution.data().error < 0.02);
    assert_eq!(log.len(), outcome.iterations);
    for w in outcome.history.windows(2) {
        assert!(w[1] >= w[0]);
    }
}

#[test]
fn test_series_runs_to_completion_without_policy_stop() {
    let (reasoner, _) = reasoner();
    let config = SeriesConfig::default()
        .with_series(AlternatingSeries::AlternatingHarmonic)
        .with_max_iterations(5)
        .with_step_delay(Duration::ZERO);
    let mut algorithm = AnytimeAlgorithm::new(SeriesRefiner::new(config).unwrap());

    let outcome = reasoner
        .run_control_loop(
            &mut algorithm,
            &MovingAveragePredictor::default(),
            &TimeoutStopping::new(Duration::from_secs(30)),
        )
        .unwrap();

    assert_eq!(outcome.reason, StopReason::AlgorithmCompleted);
    assert_eq!(outcome.final_state, AlgorithmState::CompletedNaturally);
    assert_eq!(outcome.solution.data().terms, 60);
}

#[test]
fn test_ordering_with_composite_stopping() {
    let (reasoner, log) = reasoner();
    let config = OrderingConfig::default()
        .with_items(10)
        .with_step_delay(Duration::from_millis(1))
        .with_seed(7);
    let mut algorithm = AnytimeAlgorithm::new(OrderingProblem::new(config).unwrap());
    let stopping = CompositeStopping::new(vec![
        Box::new(UtilityStopping::default()),
        Box::new(TimeoutStopping::new(Duration::from_secs(2))),
    ])
    .unwrap();

    let outcome = reasoner
        .run_control_loop(&mut algorithm, &LinearPredictor::default(), &stopping)
        .unwrap();

    assert!(outcome.elapsed < Duration::from_secs(3));
    assert!(outcome.solution.quality() > 0.0 && outcome.solution.quality() <= 1.0);
    assert!(outcome.history.iter().all(|&q| (0.0..=1.0).contains(&q)));
    assert_eq!(log.events().last().unwrap().decision, Some(outcome.reason.clone()));
    assert!(!algorithm.running());

    let order = &outcome.solution.data().order;
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_zero_iteration_budget_returns_initial_solution() {
    let (reasoner, _) = reasoner();
    let config = OrderingConfig::default()
        .with_max_iterations(0)
        .with_seed(3);
    let mut reference = OrderingProblem::new(config.clone()).unwrap();
    let initial = reference.initial_solution().unwrap();

    let mut algorithm = AnytimeAlgorithm::new(OrderingProblem::new(config).unwrap());
    let outcome = reasoner
        .run_control_loop(
            &mut algorithm,
            &LinearPredictor::default(),
            &QualityThresholdStopping::new(1.0).unwrap(),
        )
        .unwrap();

    assert_eq!(outcome.reason, StopReason::AlgorithmCompleted);
    assert_eq!(outcome.solution.data(), initial.data());
    assert_eq!(outcome.solution.quality(), initial.quality());
}

struct BrokenStart;

impl AnytimeProblem for BrokenStart {
    type Data = ();

    fn initial_solution(&mut self) -> Result<Solution<()>, AlgorithmError> {
        Err(AlgorithmError::Initialization("no input".into()))
    }

    fn compute_step(&mut self, _slot: &SolutionSlot<()>) -> Result<bool, AlgorithmError> {
        Ok(false)
    }
}

#[test]
fn test_initialization_failure_propagates() {
    let (reasoner, log) = reasoner();
    let mut algorithm = AnytimeAlgorithm::new(BrokenStart);
    let err = reasoner
        .run_control_loop(
            &mut algorithm,
            &LinearPredictor::default(),
            &TimeoutStopping::default(),
        )
        .unwrap_err();

    assert_eq!(
        err,
        MetaError::Algorithm(AlgorithmError::Initialization("no input".into()))
    );
    assert_eq!(algorithm.state(), AlgorithmState::FailedAbnormally);
    assert!(log.is_empty());
}

#[test]
fn test_double_stop_after_run_is_noop() {
    let (reasoner, _) = reasoner();
    let mut algorithm = AnytimeAlgorithm::new(series(Duration::from_millis(1)));
    reasoner
        .run_control_loop(
            &mut algorithm,
            &LinearPredictor::default(),
            &TimeoutStopping::new(Duration::from_millis(30)),
        )
        .unwrap();

    let state = algorithm.state();
    assert_eq!(algorithm.stop(), StopOutcome::NotRunning);
    assert_eq!(algorithm.stop(), StopOutcome::NotRunning);
    assert_eq!(algorithm.state(), state);
}

#[test]
fn test_algorithm_is_reusable_across_runs() {
    let (reasoner, _) = reasoner();
    let mut algorithm = AnytimeAlgorithm::new(series(Duration::from_millis(1)));
    let predictor = LinearPredictor::default();
    let stopping = TimeoutStopping::new(Duration::from_millis(20));

    let first = reasoner
        .run_control_loop(&mut algorithm, &predictor, &stopping)
        .unwrap();
    let second = reasoner
        .run_control_loop(&mut algorithm, &predictor, &stopping)
        .unwrap();

    assert_eq!(first.history[0], second.history[0]);
    assert!(algorithm.problem().is_some());
}
