//! # clustervis
//!
//! `clustervis` is a Rust library for incremental spatial clustering on a 2D
//! canvas, designed to be used in Rust as well as compiled to WebAssembly
//! (WASM). It grows density-based clusters point by point and emits each
//! algorithmic step as a renderable animation frame.
//!
//! ## Features
//!
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with JavaScript and TypeScript.
//! - **Worklist Clustering**: A breadth-first DBSCAN variant tuned for animation, with a radius-based neighbor scan and lazy per-cluster color allocation.
//! - **Cooperative Playback**: One render yield and one configurable delay per processed point, cancellable at both suspension points and restartable at any time.
//! - **Live Point Editing**: Points can be placed, scattered, erased or dragged while a run is in flight; the engine re-reads positions every step.
//!
//! ## Example
//!
//! See the `demos/` directory for a full run rendered to SVG.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`Engine`] struct, which owns the run
//! lifecycle, driven either by [`Engine::run`] over a [`Scheduler`] or one
//! [`Engine::tick`] at a time from a host timer.

mod color;
mod engine;
mod frame;
mod geometry;
mod membership;
mod point;
mod scan;
mod scheduler;
mod wasm;

pub use color::Color;
pub use color::EntropySource;
pub use color::FixedEntropy;
pub use color::WallClock;
pub use color::deterministic_color;
pub use engine::Engine;
pub use engine::EngineError;
pub use engine::EngineHandle;
pub use engine::Params;
pub use engine::RunOutcome;
pub use engine::Speed;
pub use engine::Tick;
pub use frame::BoundaryRing;
pub use frame::Frame;
pub use frame::FrameLog;
pub use frame::FrameSink;
pub use frame::HALO_OPACITY;
pub use geometry::squared_distance;
pub use geometry::within_radius;
pub use membership::ClusterMembership;
pub use point::ERASE_RADIUS;
pub use point::Point;
pub use point::PointId;
pub use point::PointSet;
pub use point::PointSource;
pub use point::SCATTER_COUNT;
pub use scan::NeighborScan;
pub use scan::scan;
pub use scheduler::CancelToken;
pub use scheduler::NoDelay;
pub use scheduler::Scheduler;
pub use scheduler::Step;
pub use scheduler::ThreadScheduler;
