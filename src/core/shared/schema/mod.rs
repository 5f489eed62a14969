pub mod ticketing;
pub use self::ticketing::*;
