#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod record;

pub use catalog::QuestionCatalog;
pub use error::CatalogError;
pub use record::QuestionRecord;
