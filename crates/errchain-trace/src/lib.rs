//! errchain-trace — call-stack snapshots for error chains
//!
//! A [`Snapshot`] is taken once, when an error chain is created, and is only
//! turned into text when somebody asks for the verbose form of the error.
//! Capturing is cheap: frames are recorded as raw instruction pointers and
//! symbol resolution is deferred to [`Snapshot::render`] / [`Snapshot::frames`].
//!
//! Capture behaviour is controlled by [`CaptureConfig`]. The process-wide
//! default is read once from the environment:
//!
//! - `ERRCHAIN_TRACE=0|off|false` disables capture entirely.
//! - `ERRCHAIN_TRACE_DEPTH=<n>` limits the number of rendered frames
//!   (clamped to `1..=128`, default 16).
//!
//! ```rust,ignore
//! use errchain_trace::{CaptureConfig, Snapshot};
//!
//! let snapshot = Snapshot::capture_with(&CaptureConfig::builder().with_depth(4).build());
//! for frame in snapshot.frames() {
//!     println!("{frame}");
//! }
//! ```

pub mod config;
mod sanitize;
pub mod snapshot;

pub use config::{CaptureConfig, CaptureConfigBuilder};
pub use snapshot::{Frame, Snapshot};
