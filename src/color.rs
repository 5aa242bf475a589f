use rand::prelude::*;
use rand::rngs::StdRng;

/// An RGB color as handed to the host renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex string, e.g. `#1a2b3c`, for SVG/canvas hosts.
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Produce a visually distinct color for an increasing seed.
///
/// The hue walks the golden angle so consecutive seeds land far apart on the
/// color wheel; saturation and lightness get a small seeded jitter so large
/// palettes do not look banded. Fully determined by `seed`.
pub fn deterministic_color(seed: u64) -> Color {
    let mut rng = StdRng::seed_from_u64(seed);
    let hue = (seed as f64 * 137.50776405003785) % 360.0;
    let saturation = rng.gen_range(0.65..0.9);
    let lightness = rng.gen_range(0.45..0.6);
    hsl_to_rgb(hue, saturation, lightness)
}

/// Convert HSL to RGB. Hue in degrees, saturation and lightness in [0, 1].
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Color {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    Color::new(
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

/// Source of the base seed mixed into each newly allocated palette color.
///
/// The engine asks for a seed once per discovered cluster and offsets it by
/// the palette length, so a wall-clock source gives fresh colors per run
/// while a fixed source makes whole runs reproducible for snapshot tests.
pub trait EntropySource {
    fn seed(&mut self) -> u64;
}

/// Wall-clock entropy: colors differ between runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl EntropySource for WallClock {
    fn seed(&mut self) -> u64 {
        now_millis()
    }
}

/// Fixed entropy: every run recolors identically. Meant for tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedEntropy(pub u64);

impl EntropySource for FixedEntropy {
    fn seed(&mut self) -> u64 {
        self.0
    }
}

fn now_millis() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
