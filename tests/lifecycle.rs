use clustervis::{
    Engine, EngineError, FixedEntropy, FrameLog, NoDelay, PointSet, RunOutcome, Scheduler, Speed,
    Step,
};
use std::time::Duration;

/// Scheduler that records every suspension and can cancel at a chosen one.
/// Suspensions are counted across both kinds, in engine order:
/// yield, delay, yield, delay, ...
#[derive(Default)]
struct ScriptedScheduler {
    cancel_at: Option<usize>,
    suspensions: usize,
    delays: Vec<Duration>,
}

impl ScriptedScheduler {
    fn cancel_at(n: usize) -> Self {
        Self {
            cancel_at: Some(n),
            ..Self::default()
        }
    }

    fn step(&mut self) -> Step {
        let n = self.suspensions;
        self.suspensions += 1;
        match self.cancel_at {
            Some(at) if n >= at => Step::Cancelled,
            _ => Step::Resume,
        }
    }
}

impl Scheduler for ScriptedScheduler {
    fn yield_for_render(&mut self) -> Step {
        self.step()
    }

    fn delay(&mut self, duration: Duration) -> Step {
        self.delays.push(duration);
        self.step()
    }
}

fn dense_set() -> PointSet {
    let mut set = PointSet::new();
    for i in 0..12 {
        set.add((i % 4) as f64 * 12.0, (i / 4) as f64 * 12.0);
    }
    set
}

fn engine(radius: f64, min_neighbors: usize) -> Engine {
    let mut e = Engine::with_entropy(FixedEntropy(3));
    e.set_parameters(radius, min_neighbors).unwrap();
    e
}

#[test]
fn test_run_terminates_on_large_set() {
    let mut set = PointSet::new();
    for x in 0..20 {
        for y in 0..20 {
            set.add(x as f64 * 25.0, y as f64 * 25.0);
        }
    }

    let mut e = engine(30.0, 3);
    let mut sink = FrameLog::new();
    let outcome = e.run(&set, &mut sink, &mut NoDelay::new()).unwrap();

    assert!(matches!(outcome, RunOutcome::Completed { .. }));
    assert_eq!(sink.runs_ended(), 1);
    assert!(!e.is_running());
}

#[test]
fn test_run_ended_fires_exactly_once_per_run() {
    let set = dense_set();
    let mut e = engine(20.0, 3);
    let mut sink = FrameLog::new();

    e.run(&set, &mut sink, &mut NoDelay::new()).unwrap();
    assert_eq!(sink.runs_ended(), 1);

    e.run(&set, &mut sink, &mut NoDelay::new()).unwrap();
    assert_eq!(sink.runs_ended(), 2);
}

#[test]
fn test_cancel_at_render_yield_clears_everything() {
    let set = dense_set();
    let mut e = engine(20.0, 3);
    let mut sink = FrameLog::new();

    // Suspension 4 is the yield before the third worklist item.
    let mut sched = ScriptedScheduler::cancel_at(4);
    let outcome = e.run(&set, &mut sink, &mut sched).unwrap();

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(sink.frames().is_empty());
    assert!(sink.ring().is_none());
    assert_eq!(sink.runs_ended(), 0);
    assert!(!e.is_running());
    assert!(e.membership().is_empty());
    assert!(e.palette().is_empty());
}

#[test]
fn test_cancel_at_delay_clears_everything() {
    let set = dense_set();
    let mut e = engine(20.0, 3);
    let mut sink = FrameLog::new();

    // Suspension 1 is the delay after the first worklist item.
    let mut sched = ScriptedScheduler::cancel_at(1);
    let outcome = e.run(&set, &mut sink, &mut sched).unwrap();

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(sink.frames().is_empty());
    assert_eq!(sink.runs_ended(), 0);
    assert!(!e.is_running());
}

#[test]
fn test_cancel_from_another_thread_lands_promptly() {
    use clustervis::ThreadScheduler;

    let set = dense_set();
    let mut e = engine(20.0, 3);
    e.set_speed(Speed::Slow);
    let mut sink = FrameLog::new();

    let handle = e.handle();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        handle.cancel();
    });

    let mut sched = ThreadScheduler::new(e.cancel_token());
    let outcome = e.run(&set, &mut sink, &mut sched).unwrap();
    canceller.join().unwrap();

    // At 400ms per item the 12-point run takes seconds; the 50ms cancel must
    // interrupt it long before natural completion.
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(sink.frames().is_empty());
    assert_eq!(sink.runs_ended(), 0);
    assert!(!e.is_running());
}

#[test]
fn test_cancel_before_start_is_discarded() {
    let set = dense_set();
    let mut e = engine(20.0, 3);
    let mut sink = FrameLog::new();

    // start_run re-arms the token, so a stale cancel does not kill the run.
    e.handle().cancel();
    let outcome = e.run(&set, &mut sink, &mut NoDelay::new()).unwrap();
    assert!(matches!(outcome, RunOutcome::Completed { .. }));
}

#[test]
fn test_restart_after_cancel_reproduces_full_run() {
    let set = dense_set();
    let mut e = engine(20.0, 3);

    let mut full = FrameLog::new();
    e.run(&set, &mut full, &mut NoDelay::new()).unwrap();
    let expected = full.frames().len();
    assert!(expected > 0);

    let mut sink = FrameLog::new();
    let mut sched = ScriptedScheduler::cancel_at(3);
    assert_eq!(
        e.run(&set, &mut sink, &mut sched).unwrap(),
        RunOutcome::Cancelled
    );

    // A fresh run after cancellation starts from scratch.
    e.run(&set, &mut sink, &mut NoDelay::new()).unwrap();
    assert_eq!(sink.frames().len(), expected);
    assert_eq!(sink.runs_ended(), 1);
}

#[test]
fn test_start_run_rejected_while_running() {
    let mut e = engine(20.0, 3);
    let mut sink = FrameLog::new();
    e.start_run(&mut sink).unwrap();
    assert_eq!(e.start_run(&mut sink), Err(EngineError::AlreadyRunning));
    // The in-flight run is unaffected by the rejected start.
    assert!(e.is_running());
}

#[test]
fn test_parameter_errors_are_synchronous() {
    let mut e = Engine::with_entropy(FixedEntropy(3));
    assert!(matches!(
        e.set_parameters(-1.0, 3),
        Err(EngineError::InvalidRadius(_))
    ));
    assert!(matches!(
        e.set_parameters(10.0, 0),
        Err(EngineError::InvalidMinNeighbors(0))
    ));
    // A failed update leaves the previous parameters in place.
    assert_eq!(e.params().radius(), 40.0);
    assert_eq!(e.params().min_neighbors(), 4);
}

#[test]
fn test_speed_change_effective_next_suspension() {
    let set = dense_set();
    let mut e = engine(20.0, 3);
    e.set_speed(Speed::Slow);
    let mut sink = FrameLog::new();
    let mut sched = ScriptedScheduler::default();

    // Flip the speed through the handle as soon as the run starts; the
    // scheduler then sees the new delay on every subsequent item.
    let handle = e.handle();
    handle.set_speed(Speed::Fast);
    e.run(&set, &mut sink, &mut sched).unwrap();

    assert!(!sched.delays.is_empty());
    assert!(
        sched
            .delays
            .iter()
            .all(|d| *d == Speed::Fast.as_duration())
    );
}

#[test]
fn test_delay_requested_once_per_item_even_when_skipped() {
    // Two isolated points: every worklist item takes the saturation skip,
    // yet the playback delay still paces each one.
    let mut set = PointSet::new();
    set.add(0.0, 0.0);
    set.add(1000.0, 1000.0);

    let mut e = engine(50.0, 2);
    let mut sink = FrameLog::new();
    let mut sched = ScriptedScheduler::default();
    e.run(&set, &mut sink, &mut sched).unwrap();

    // One delay per processed worklist item (two seeds, no expansions).
    assert_eq!(sched.delays.len(), 2);
}
