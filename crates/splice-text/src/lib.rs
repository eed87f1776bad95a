//! Offset-precise text primitives shared by the completion engine.
#![deny(missing_docs)]
//!
//! Offsets are byte offsets into UTF-8 buffers and always sit on `char`
//! boundaries. Protocol positions (line plus UTF-16 column) only appear in
//! [`LineIndex`], which callers use at their protocol boundary.

mod diff;
mod edit;
mod line_index;
mod range;

pub use diff::{BufferDiffer, CharDiffer};
pub use edit::{EditError, TextEdit, apply_edits};
pub use line_index::{LineIndex, PositionError};
pub use range::TextRange;

#[cfg(test)]
mod tests;
