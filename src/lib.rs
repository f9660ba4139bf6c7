pub mod error;
pub mod feed;
pub mod league;
pub mod model;
pub mod store;
pub mod xlsx;

pub use error::{PickemError, Result};
pub use model::*;
