pub mod enums;
pub mod error;
pub mod models;
pub mod pagination;
pub mod schema;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod utils;

pub use enums::{Department, Severity};
pub use error::ApiError;
pub use state::AppState;
pub use utils::DbPool;
