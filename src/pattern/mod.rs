//! Markdown recognition.
//!
//! Both matchers are pure: they look at text and return a verdict, never
//! touching the document. The editor handlers decide what to do with it.

pub mod block;
pub mod inline;

pub use block::{BlockConversion, match_block};
pub use inline::{InlineMatch, match_inline};
