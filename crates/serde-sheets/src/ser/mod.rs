//! Writing values as sheet rows

mod context;
mod output;
mod serializer;
mod writer;

pub use context::SheetStreamContext;
pub use output::{SheetOutput, DEFAULT_SHEET_NAME};
pub use serializer::{Compound, RootMode, SheetGenerator};
pub use writer::SheetWriter;
