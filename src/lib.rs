//! Freehand 3D stroke drawing and geometric erasure engine.
//!
//! The crate owns the data side of a 3D pen: strokes are sampled from a moving
//! tip, simplified and committed into an ordered store of colored polylines.
//! An eraser sphere can remove whole lines, clear everything it touches, or
//! erase partially by splicing the point sequences it crosses. Renderers only
//! ever see flat per-color buffers with break sentinels between strokes and an
//! optional highlight buffer.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Tick-driven [`engine::Engine`] and its [`engine::Event`]s |
//! | [`store`] | Ordered polyline store with cached bounds |
//! | [`buffer`] | Per-color flattened render buffers |
//! | [`session`] | In-progress stroke accumulation |
//! | [`erase`] | Whole-line, clear-all and partial erase; eraser trail |
//! | [`mark`] | Highlight of the line the eraser would remove |
//! | [`simplify`] | Radial + Ramer–Douglas–Peucker stroke simplification |
//! | [`geom`] | Sphere/box and sphere/segment tests, [`geom::Aabb`] |
//! | [`config`] | [`config::EngineConfig`] and its validation |
//! | [`consts`] | Shared numeric constants (break sentinel, defaults) |

pub mod buffer;
pub mod config;
pub mod consts;
pub mod engine;
pub mod erase;
pub mod geom;
pub mod mark;
pub mod session;
pub mod simplify;
pub mod store;
