pub mod category;
pub mod record;
pub mod region;
pub mod table;

pub use category::CategoryLookup;
pub use record::VideoRecord;
pub use region::{RatioKind, Region};
pub use table::VideoTable;
