//! # Utility Functions
//!
//! Document helpers used around intent detection.
//!
//! ### Text (`text`)
//! - **Position Splitting**: turn a full document and a cursor into prefix/suffix
//!
//! ### Vue (`vue`)
//! - **Script Extraction**: pull the `<script>` block out of a single-file component
//! - **Position Mapping**: translate editor positions into script coordinates

pub mod text;
pub mod vue;

pub use text::{offset_at_position, split_text_at_position};
pub use vue::{ScriptBlock, ScriptLanguage, extract_script};
