//! kino-player library surface.
//!
//! Contains the view-model layer, the command objects and the composition
//! root used by the executable in `src/main.rs`. Exposed as a library mainly
//! to enable testing and internal reuse.

pub mod app;
pub mod commands;
pub mod view_models;
