pub mod error;
pub mod job_query;
pub mod types;

pub use error::FilterError;
pub use job_query::JobQuery;
pub use types::*;
