//! Error classification for the recipe-service HTTP layer.
//!
//! When a handler or storage wrapper raises, the caught error is handed to
//! [`ErrorClassifier::classify`], which translates it into an HTTP status
//! and a user-safe JSON body. The classifier is stateless: it never
//! mutates or re-throws, only translates. Full error detail is always
//! logged server-side; the client sees a fixed message plus a fresh
//! correlation id that also appears in the log line.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod caught;
pub mod classifier;
pub mod response;

// Re-export commonly used types for convenience
// ------------------------
pub use caught::{CaughtError, TransportInfo};
pub use classifier::{ClassifierConfig, ErrorClassifier, RequestContext};
pub use response::{ErrorBody, ErrorResponse};
