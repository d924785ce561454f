//! Completion vs generation intent detection
//!
//! Resolution runs as an ordered chain over one parsed document:
//! the comment resolver first, then the small-file heuristic, then the
//! empty-body resolver. [`IntentDetector`] wraps the chain with parsing and
//! configuration for editor documents.

pub mod comments;
pub mod detector;
pub mod empty_function;
pub mod resolver;
pub mod small_file;

pub use comments::{Comment, CommentCapture, CommentResolution, CommentResolver};
pub use detector::IntentDetector;
pub use empty_function::{EmptyBodyRegion, EmptyFunctionResolver};
pub use resolver::{GenerationType, Intent, IntentRequest, IntentResolution, IntentResolver};
pub use small_file::{is_small_file, is_small_file_with_threshold};
