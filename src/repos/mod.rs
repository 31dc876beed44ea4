pub mod error;
pub mod example_repo;

pub use error::RepoError;
pub use example_repo::{Example, ExampleRepo, MemoryExampleRepo};
