pub mod error;
pub mod store;
pub mod types;

pub use error::Error;
pub use store::RecordStore;
pub use types::{Article, ArticleId, NewArticle};

pub type Result<T> = std::result::Result<T, Error>;

/// Base URL of the record store when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Collection path served by the record store.
pub const COLLECTION: &str = "blogs";
