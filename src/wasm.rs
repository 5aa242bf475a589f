use crate::engine::{Engine, Speed, Tick};
use crate::frame::{Frame, FrameLog};
use crate::point::{ERASE_RADIUS, PointId, PointSet};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_SPEED: &'static str = r#"
export const SPEED_SLOW = 0;
export const SPEED_AVERAGE = 1;
export const SPEED_FAST = 2;
export const SPEED_FASTER = 3;
export const SPEED_INSTANT = 4;
"#;

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_FRAME: &'static str = r#"
export const FRAME_KIND_MARKER = 0;
export const FRAME_KIND_HALO = 1;
export const FRAME_STRIDE = 8;
"#;

/// Floats per encoded frame record: kind, x, y, radius, r, g, b, opacity.
const FRAME_STRIDE: usize = 8;

fn speed_from_level(level: u32) -> Speed {
    match level {
        0 => Speed::Slow,
        1 => Speed::Average,
        2 => Speed::Fast,
        4 => Speed::Instant,
        _ => Speed::Faster,
    }
}

fn encode_frame(out: &mut Vec<f64>, frame: &Frame) {
    match *frame {
        Frame::Marker { x, y, color } => {
            out.push(0.0);
            out.push(x);
            out.push(y);
            out.push(0.0);
            out.push(color.r as f64);
            out.push(color.g as f64);
            out.push(color.b as f64);
            out.push(1.0);
        }
        Frame::Halo {
            x,
            y,
            radius,
            color,
            opacity,
        } => {
            out.push(1.0);
            out.push(x);
            out.push(y);
            out.push(radius);
            out.push(color.r as f64);
            out.push(color.g as f64);
            out.push(color.b as f64);
            out.push(opacity);
        }
    }
}

/// WASM wrapper unifying the point board, the clustering engine and its
/// frame buffer behind a single JS class.
///
/// The JS host owns the animation loop: after `start_run`, call `tick()`
/// repeatedly via `setTimeout(loop, delay)` where `delay` is `tick`'s return
/// value; a negative return means the run is over. Returning to the event
/// loop between ticks doubles as the render yield, and the timeout is the
/// playback delay.
#[wasm_bindgen(js_name = ClusterEngine)]
pub struct ClusterEngineWASM {
    engine: Engine,
    points: PointSet,
    frames: FrameLog,
}

#[wasm_bindgen(js_class = ClusterEngine)]
impl ClusterEngineWASM {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ClusterEngineWASM {
        ClusterEngineWASM {
            engine: Engine::new(),
            points: PointSet::new(),
            frames: FrameLog::new(),
        }
    }

    // --- Board gestures ---

    /// Place a single point, returning its id.
    pub fn add_point(&mut self, x: f64, y: f64) -> PointId {
        self.points.add(x, y)
    }

    /// Place a burst of points around `(x, y)`; returns the first id.
    pub fn scatter(&mut self, x: f64, y: f64, spread: f64) -> PointId {
        self.points.scatter(x, y, spread)
    }

    /// Erase all points near `(x, y)`; returns how many were removed.
    pub fn remove_near(&mut self, x: f64, y: f64) -> usize {
        self.points.remove_near(x, y, ERASE_RADIUS)
    }

    /// Drag an existing point to a new position. Legal mid-run.
    pub fn move_point(&mut self, id: PointId, x: f64, y: f64) {
        self.points.move_to(id, x, y);
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn count_points(&self) -> usize {
        self.points.len()
    }

    /// All points as a flat `[id, x, y, ...]` array.
    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.points.len() * 3);
        for p in self.points.iter() {
            out.push(p.id as f64);
            out.push(p.x);
            out.push(p.y);
        }
        out
    }

    // --- Engine control ---

    pub fn set_parameters(&mut self, radius: f64, min_neighbors: usize) -> Result<(), JsValue> {
        self.engine
            .set_parameters(radius, min_neighbors)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// One of the `SPEED_*` constants; effective from the next tick.
    pub fn set_speed(&mut self, level: u32) {
        self.engine.set_speed(speed_from_level(level));
    }

    pub fn start_run(&mut self) -> Result<(), JsValue> {
        self.engine
            .start_run(&mut self.frames)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Process one worklist item. Returns the delay in milliseconds to wait
    /// before the next call, or a negative value once the run is over.
    pub fn tick(&mut self) -> f64 {
        match self.engine.tick(&self.points, &mut self.frames) {
            Tick::Processed => self.engine.speed_millis() as f64,
            Tick::Finished | Tick::Idle => -1.0,
        }
    }

    pub fn reset_run(&mut self) {
        self.engine.reset_run(&mut self.frames);
    }

    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    // --- Visual output ---

    /// Drain newly emitted frames as flat records of `FRAME_STRIDE` floats:
    /// kind, x, y, radius, r, g, b, opacity.
    pub fn take_frames(&mut self) -> Vec<f64> {
        let frames = self.frames.take_frames();
        let mut out = Vec::with_capacity(frames.len() * FRAME_STRIDE);
        for frame in &frames {
            encode_frame(&mut out, frame);
        }
        out
    }

    /// The live boundary ring as `[x, y, radius, r, g, b]`, or an empty
    /// array when no ring is shown.
    #[wasm_bindgen(getter)]
    pub fn ring(&self) -> Vec<f64> {
        match self.frames.ring() {
            Some(ring) => vec![
                ring.x,
                ring.y,
                ring.radius,
                ring.color.r as f64,
                ring.color.g as f64,
                ring.color.b as f64,
            ],
            None => Vec::new(),
        }
    }

    /// Cluster index of a point during a run, or `undefined` if unassigned.
    pub fn cluster_of(&self, id: PointId) -> Option<usize> {
        self.engine.membership().get(id)
    }

    #[wasm_bindgen(getter)]
    pub fn count_clusters(&self) -> usize {
        self.engine.palette().len()
    }

    /// How many runs have completed naturally since construction.
    #[wasm_bindgen(getter)]
    pub fn runs_ended(&self) -> usize {
        self.frames.runs_ended()
    }
}

impl Default for ClusterEngineWASM {
    fn default() -> Self {
        Self::new()
    }
}
