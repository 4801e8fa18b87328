//! Concrete implementations of the domain ports plus the REST handlers.

pub mod api_handler;
pub mod catalog;
pub mod http_options;
pub mod http_schema;
pub mod static_options;
pub mod submission_store;

pub use catalog::CatalogSchemaSource;
pub use http_options::HttpOptionsSource;
pub use http_schema::HttpSchemaSource;
pub use static_options::StaticOptionsSource;
pub use submission_store::{InMemorySubmissionStore, SubmissionRecord};
