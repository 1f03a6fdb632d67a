pub mod error;
pub mod schema;
pub mod table;
pub mod varint;
pub mod window;

pub use error::{Error, Result};
pub use schema::{Comment, DataType, Field, COMMENT_PREFIX, TOP_LEVEL_PREFIX};
pub use table::{Table, TableBuilder};
pub use window::TimeWindow;
