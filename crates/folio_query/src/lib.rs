//! Client-side query cache for record store reads.
//!
//! Reads are keyed by a logical [`QueryKey`]. Identical in-flight loads are
//! shared, successful results are served from memory until they go stale or
//! are invalidated, and every read reports a [`QueryState`]. Invalidation also
//! reaches loads that are still in flight.

pub mod cache;
pub mod key;
pub mod queries;
pub mod state;

pub use cache::{QueryCache, QueryConfig};
pub use key::QueryKey;
pub use state::{QueryState, QueryStatus};

pub mod prelude {
    pub use super::queries;
    pub use super::{QueryCache, QueryConfig, QueryKey, QueryState, QueryStatus};
}
