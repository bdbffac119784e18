//! Reading sheet rows as values

mod deserializer;
mod input;
mod location;
mod node;
mod parser;
mod reader;

pub use deserializer::RowDeserializer;
pub use input::SheetInput;
pub use location::SheetLocation;
pub use node::RowNode;
pub use parser::{Row, SheetParser};
pub use reader::{SheetReader, WorksheetReader};
