#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod progress;

pub use catalog::{Catalog, ProblemQuery};
pub use error::Error;
