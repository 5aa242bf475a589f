use crate::geometry::squared_distance;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Stable identifier of a point, unique for the point's lifetime.
pub type PointId = u32;

/// Number of points placed by one [`PointSet::scatter`] gesture.
pub const SCATTER_COUNT: usize = 9;

/// Default erase tolerance in canvas units for [`PointSet::remove_near`].
pub const ERASE_RADIUS: f64 = 20.0;

/// A user-placed point on the canvas.
///
/// `x`/`y` may change at any time through [`PointSet::move_to`], including
/// while a clustering run is in flight; `id` never changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Read access to the current point set.
///
/// The engine pulls a fresh snapshot through this trait once per worklist
/// item and never caches positions across a suspension point, so the host is
/// free to drag points around between steps.
pub trait PointSource {
    fn snapshot(&self) -> Vec<Point>;
}

/// The host-side collection of canvas points, in insertion order.
///
/// This mirrors the gestures an interactive board offers: single placement,
/// a scatter burst of several points at once, erasing everything near a
/// position, and dragging an existing point.
#[derive(Debug, Default)]
pub struct PointSet {
    points: Vec<Point>,
    next_id: PointId,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a single point and return its id.
    pub fn add(&mut self, x: f64, y: f64) -> PointId {
        let id = self.next_id;
        self.next_id += 1;
        self.points.push(Point::new(id, x, y));
        id
    }

    /// Place a burst of [`SCATTER_COUNT`] points with consecutive ids:
    /// one at `(x, y)` and eight spread around it within `spread` units.
    /// Returns the id of the first point of the burst.
    pub fn scatter(&mut self, x: f64, y: f64, spread: f64) -> PointId {
        let mut rng = StdRng::seed_from_u64(get_seed());
        let first = self.add(x, y);
        self.add(x + spread * rng.gen_range(0.0..1.0), y);
        self.add(x - spread * rng.gen_range(0.0..1.0), y);
        self.add(x, y + spread * rng.gen_range(0.0..1.0));
        self.add(x, y - spread);
        self.add(
            x + spread * rng.gen_range(0.0..1.0),
            y + spread * rng.gen_range(0.0..1.0),
        );
        self.add(
            x - spread * rng.gen_range(0.0..1.0),
            y - spread * rng.gen_range(0.0..1.0),
        );
        self.add(x + spread * rng.gen_range(0.0..1.0), y - spread);
        self.add(
            x - spread * rng.gen_range(0.0..1.0),
            y + spread * rng.gen_range(0.0..1.0),
        );
        first
    }

    /// Erase every point within `tolerance` of `(x, y)` (true distance,
    /// boundary inclusive). Returns how many points were removed.
    pub fn remove_near(&mut self, x: f64, y: f64, tolerance: f64) -> usize {
        let before = self.points.len();
        self.points
            .retain(|p| squared_distance(p.position(), [x, y]).sqrt() > tolerance);
        before - self.points.len()
    }

    /// Move an existing point; a stale id is ignored.
    pub fn move_to(&mut self, id: PointId, x: f64, y: f64) {
        if let Some(p) = self.points.iter_mut().find(|p| p.id == id) {
            p.x = x;
            p.y = y;
        }
    }

    /// Remove a single point by id. Returns whether it existed.
    pub fn remove(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        before != self.points.len()
    }

    pub fn get(&self, id: PointId) -> Option<Point> {
        self.points.iter().copied().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

impl PointSource for PointSet {
    fn snapshot(&self) -> Vec<Point> {
        self.points.clone()
    }
}

impl PointSource for std::sync::RwLock<PointSet> {
    fn snapshot(&self) -> Vec<Point> {
        match self.read() {
            Ok(set) => set.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }
}

impl PointSource for Vec<Point> {
    fn snapshot(&self) -> Vec<Point> {
        self.clone()
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}
