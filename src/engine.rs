use crate::color::{Color, EntropySource, WallClock, deterministic_color};
use crate::frame::{BoundaryRing, Frame, FrameSink, HALO_OPACITY};
use crate::membership::ClusterMembership;
use crate::point::{PointId, PointSource};
use crate::scan::scan;
use crate::scheduler::{CancelToken, Scheduler, Step};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Playback speed: the delay inserted after each processed worklist item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Speed {
    Slow,
    Average,
    Fast,
    #[default]
    Faster,
    /// No delay at all; the run is paced by render yields only.
    Instant,
}

impl Speed {
    pub fn as_millis(self) -> u64 {
        match self {
            Speed::Slow => 400,
            Speed::Average => 250,
            Speed::Fast => 120,
            Speed::Faster => 50,
            Speed::Instant => 0,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }
}

/// Clustering parameters, validated on construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    radius: f64,
    min_neighbors: usize,
}

impl Params {
    /// `radius` must be finite and positive, `min_neighbors` at least 1.
    pub fn new(radius: f64, min_neighbors: usize) -> Result<Self, EngineError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(EngineError::InvalidRadius(radius));
        }
        if min_neighbors < 1 {
            return Err(EngineError::InvalidMinNeighbors(min_neighbors));
        }
        Ok(Self {
            radius,
            min_neighbors,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn min_neighbors(&self) -> usize {
        self.min_neighbors
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            radius: 40.0,
            min_neighbors: 4,
        }
    }
}

/// Errors surfaced by the engine's control interface. All are rejected
/// synchronously before any run state is touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// `start_run` while a run is already in flight.
    AlreadyRunning,
    /// `set_parameters` while a run is in flight.
    Busy,
    InvalidRadius(f64),
    InvalidMinNeighbors(usize),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AlreadyRunning => write!(f, "a clustering run is already active"),
            EngineError::Busy => write!(f, "parameters can only change while idle"),
            EngineError::InvalidRadius(r) => {
                write!(f, "radius must be finite and positive, got {}", r)
            }
            EngineError::InvalidMinNeighbors(m) => {
                write!(f, "min_neighbors must be at least 1, got {}", m)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Result of advancing the engine by one worklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The engine is not running; nothing happened.
    Idle,
    /// One worklist item was consumed; suspend (render yield + delay) before
    /// the next call.
    Processed,
    /// The run completed naturally; state is cleared and `run_ended` fired.
    Finished,
}

/// How a driven run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Natural completion; `clusters` is the palette size at the end.
    Completed { clusters: usize },
    /// Cancelled at a suspension point; all state and frames were cleared.
    Cancelled,
}

/// Cloneable control handle for a run in flight: cancel it or retune its
/// playback speed from outside the driving loop (or another thread).
#[derive(Clone, Debug)]
pub struct EngineHandle {
    cancel: CancelToken,
    speed_ms: Arc<AtomicU64>,
}

impl EngineHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Effective from the next suspension point onward.
    pub fn set_speed(&self, speed: Speed) {
        self.speed_ms.store(speed.as_millis(), Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
}

/// The incremental clustering engine: a worklist-driven region grower that
/// emits one batch of frames per processed point.
///
/// The engine is an explicit state machine. [`Engine::tick`] advances it by
/// exactly one worklist item and returns; the host supplies the two
/// suspension points between ticks (a render yield before, a timed delay
/// after). [`Engine::run`] packages that loop over a [`Scheduler`] for hosts
/// that want to block; a wasm host instead calls `tick` from a timer.
///
/// Point positions are re-read from a fresh [`PointSource`] snapshot on every
/// tick, so dragging points mid-run is safe. Worklist entries whose point has
/// been erased are consumed silently.
///
/// One deliberate inheritance from the reference visualizer: a worklist item
/// whose neighbors are all already assigned is skipped outright, without the
/// core-point test. Depending on discovery order this heuristic can leave a
/// genuine core point unmarked; it is kept for exact behavioral
/// compatibility, not fixed into classical DBSCAN.
pub struct Engine {
    params: Params,
    state: RunState,
    worklist: VecDeque<PointId>,
    membership: ClusterMembership,
    palette: Vec<Color>,
    seed_cursor: usize,
    color_assigned: bool,
    last_run_clusters: usize,
    speed_ms: Arc<AtomicU64>,
    cancel: CancelToken,
    entropy: Box<dyn EntropySource>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default parameters and wall-clock color entropy.
    pub fn new() -> Self {
        Self::with_entropy(WallClock)
    }

    /// Engine with an injected entropy source, for reproducible palettes.
    pub fn with_entropy(entropy: impl EntropySource + 'static) -> Self {
        Self {
            params: Params::default(),
            state: RunState::Idle,
            worklist: VecDeque::new(),
            membership: ClusterMembership::new(),
            palette: Vec::new(),
            seed_cursor: 0,
            color_assigned: false,
            last_run_clusters: 0,
            speed_ms: Arc::new(AtomicU64::new(Speed::default().as_millis())),
            cancel: CancelToken::new(),
            entropy: Box::new(entropy),
        }
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// Only valid while idle; a run in flight keeps its parameters.
    pub fn set_parameters(&mut self, radius: f64, min_neighbors: usize) -> Result<(), EngineError> {
        if self.state == RunState::Running {
            return Err(EngineError::Busy);
        }
        self.params = Params::new(radius, min_neighbors)?;
        Ok(())
    }

    /// Effective from the next suspension point onward; valid at any time.
    pub fn set_speed(&self, speed: Speed) {
        self.speed_ms.store(speed.as_millis(), Ordering::SeqCst);
    }

    pub fn speed_millis(&self) -> u64 {
        self.speed_ms.load(Ordering::SeqCst)
    }

    /// Handle for cancelling or retuning the run from outside the driver.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            cancel: self.cancel.clone(),
            speed_ms: self.speed_ms.clone(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn membership(&self) -> &ClusterMembership {
        &self.membership
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Palette size of the most recently completed run.
    pub fn last_run_clusters(&self) -> usize {
        self.last_run_clusters
    }

    /// Arm a new run: clears all prior visual and clustering state and moves
    /// to Running. Rejected while a run is already active.
    pub fn start_run(&mut self, sink: &mut dyn FrameSink) -> Result<(), EngineError> {
        if self.state == RunState::Running {
            return Err(EngineError::AlreadyRunning);
        }
        self.clear_run_state(sink);
        self.cancel.reset();
        self.state = RunState::Running;
        Ok(())
    }

    /// Force Idle, discarding membership, palette, worklist, the live ring
    /// and all emitted frames. Safe at any time, idempotent.
    pub fn reset_run(&mut self, sink: &mut dyn FrameSink) {
        self.cancel.cancel();
        self.clear_run_state(sink);
        self.state = RunState::Idle;
    }

    /// Advance by exactly one worklist item.
    ///
    /// Everything in here runs to completion without suspension; the caller
    /// yields to the renderer before this call and delays after it.
    pub fn tick(&mut self, source: &dyn PointSource, sink: &mut dyn FrameSink) -> Tick {
        if self.state != RunState::Running {
            return Tick::Idle;
        }

        let snapshot = source.snapshot();

        if self.worklist.is_empty() {
            // Move to the next not-yet-assigned seed, in point-set order.
            // The cursor advances past the chosen seed immediately: a seed is
            // attempted exactly once even if its expansion assigns nothing.
            while self.seed_cursor < snapshot.len()
                && self.membership.contains(snapshot[self.seed_cursor].id)
            {
                self.seed_cursor += 1;
            }
            match snapshot.get(self.seed_cursor) {
                Some(seed) => {
                    self.worklist.push_back(seed.id);
                    self.seed_cursor += 1;
                    self.color_assigned = false;
                }
                None => {
                    self.finish(sink);
                    return Tick::Finished;
                }
            }
        }

        let Some(node_id) = self.worklist.pop_front() else {
            return Tick::Processed;
        };
        // Re-read the anchor from the snapshot: its coordinates may have
        // moved since it was queued, and it may have been erased entirely.
        let Some(node) = snapshot.iter().find(|p| p.id == node_id).copied() else {
            return Tick::Processed;
        };

        let result = scan(&node, &snapshot, self.params.radius, &self.membership);

        // Saturation skip: every neighbor already belongs to a cluster (or
        // there are none), so expanding this node again gains nothing. No
        // frames, no membership change, not even the core-point test.
        if result.saturated() {
            return Tick::Processed;
        }

        if result.total + 1 >= self.params.min_neighbors {
            for p in &result.new_neighbors {
                self.worklist.push_back(p.id);
            }

            if !self.color_assigned {
                let seed = self.entropy.seed() + self.palette.len() as u64;
                let color = deterministic_color(seed);
                self.palette.push(color);
                self.color_assigned = true;
                self.membership.insert(node.id, self.palette.len() - 1);
                sink.push(Frame::Marker {
                    x: node.x,
                    y: node.y,
                    color,
                });
            }

            let cluster = self.palette.len() - 1;
            let color = self.palette[cluster];

            sink.set_ring(Some(BoundaryRing {
                x: node.x,
                y: node.y,
                radius: self.params.radius,
                color,
            }));
            sink.push(Frame::Halo {
                x: node.x,
                y: node.y,
                radius: self.params.radius,
                color,
                opacity: HALO_OPACITY,
            });

            for p in &result.new_neighbors {
                self.membership.insert(p.id, cluster);
                sink.push(Frame::Marker {
                    x: p.x,
                    y: p.y,
                    color,
                });
            }
        }
        // A node that fails the core test stays unassigned (noise so far) and
        // emits nothing.

        Tick::Processed
    }

    /// Drive a full run over `scheduler` until completion or cancellation.
    ///
    /// Per worklist item: render yield, tick, timed delay at the current
    /// speed. Cancellation is honored at both suspension points; a cancelled
    /// run clears its state and frames exactly like [`Engine::reset_run`].
    pub fn run(
        &mut self,
        source: &dyn PointSource,
        sink: &mut dyn FrameSink,
        scheduler: &mut dyn Scheduler,
    ) -> Result<RunOutcome, EngineError> {
        self.start_run(sink)?;

        loop {
            if scheduler.yield_for_render() == Step::Cancelled || self.cancel.is_cancelled() {
                self.reset_run(sink);
                return Ok(RunOutcome::Cancelled);
            }

            if self.tick(source, sink) == Tick::Finished {
                return Ok(RunOutcome::Completed {
                    clusters: self.last_run_clusters,
                });
            }

            let delay = Duration::from_millis(self.speed_millis());
            if scheduler.delay(delay) == Step::Cancelled || self.cancel.is_cancelled() {
                self.reset_run(sink);
                return Ok(RunOutcome::Cancelled);
            }
        }
    }

    fn finish(&mut self, sink: &mut dyn FrameSink) {
        self.last_run_clusters = self.palette.len();
        sink.set_ring(None);
        self.membership.clear();
        self.palette.clear();
        self.worklist.clear();
        self.seed_cursor = 0;
        self.color_assigned = false;
        self.state = RunState::Idle;
        sink.run_ended();
    }

    fn clear_run_state(&mut self, sink: &mut dyn FrameSink) {
        self.worklist.clear();
        self.membership.clear();
        self.palette.clear();
        self.seed_cursor = 0;
        self.color_assigned = false;
        sink.clear();
    }
}
