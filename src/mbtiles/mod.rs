//! MBTiles container access: scoped store handle and metadata decoding.

pub mod metadata;
pub mod store;

pub use metadata::Metadata;
pub use store::{flip_row, MbtilesStore};
