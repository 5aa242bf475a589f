use crate::color::Color;

/// Fill opacity of the translucent halo disk left behind each core point.
pub const HALO_OPACITY: f64 = 0.06;

/// One append-only visual unit handed to the host renderer.
///
/// Frames accumulate over a run; the engine never reads them back. The live
/// search ring is deliberately not a `Frame`: it is replaced each step, not
/// appended, and travels on its own channel (see [`FrameSink::set_ring`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// A filled point marker, drawn when a point joins a cluster.
    Marker { x: f64, y: f64, color: Color },
    /// A translucent filled disk of the search radius around a core point.
    Halo {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
        opacity: f64,
    },
}

/// The single live boundary ring showing the current search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRing {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
}

/// Consumer of the engine's visual output.
///
/// `push` appends to the frame stream, `set_ring` replaces the live ring,
/// `run_ended` fires exactly once when a run completes naturally, and
/// `clear` discards everything (run start and reset).
pub trait FrameSink {
    fn push(&mut self, frame: Frame);
    fn set_ring(&mut self, ring: Option<BoundaryRing>);
    fn run_ended(&mut self);
    fn clear(&mut self);
}

/// A buffering sink: keeps the full frame stream and the current ring in
/// memory for the host to drain. Used by the wasm wrapper, the SVG demo and
/// the test suite.
#[derive(Debug, Default)]
pub struct FrameLog {
    frames: Vec<Frame>,
    ring: Option<BoundaryRing>,
    runs_ended: usize,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Drain all buffered frames, leaving the ring in place.
    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }

    pub fn ring(&self) -> Option<BoundaryRing> {
        self.ring
    }

    /// How many runs have completed naturally since construction.
    pub fn runs_ended(&self) -> usize {
        self.runs_ended
    }

    pub fn markers(&self) -> impl Iterator<Item = &Frame> {
        self.frames
            .iter()
            .filter(|f| matches!(f, Frame::Marker { .. }))
    }
}

impl FrameSink for FrameLog {
    fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    fn set_ring(&mut self, ring: Option<BoundaryRing>) {
        self.ring = ring;
    }

    fn run_ended(&mut self) {
        self.runs_ended += 1;
    }

    fn clear(&mut self) {
        self.frames.clear();
        self.ring = None;
    }
}
