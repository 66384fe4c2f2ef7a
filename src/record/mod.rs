//! Records and their on-disk artifacts
//!
//! - `schema`: the Record model and paged result types
//! - `store`: the RecordStore port and its JSON-file implementation
//! - `assets`: resolution of a record's media and side-files

pub mod assets;
pub mod schema;
pub mod store;

pub use assets::{RecordAssetResolver, EXTRA_DATA_EXTENSION, SUBTITLE_EXTENSION};
pub use schema::{Paged, Record, RecordQuery};
pub use store::{JsonRecordStore, RecordStore};
