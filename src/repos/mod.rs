pub mod error;
pub mod posts;

pub use error::{RepoError, RepoResult};
