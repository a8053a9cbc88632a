pub mod cache;
pub mod client;
pub mod keys;

pub use cache::{QueryCache, QueryKey, QueryStatus};
pub use client::{provide_query_client, use_query_client, QueryClient};
