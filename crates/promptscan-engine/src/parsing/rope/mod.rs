pub mod lines;
pub mod position;
pub mod span;

pub use lines::{LineRef, lines_with_spans};
pub use position::{SourceRange, column_of};
pub use span::Span;
