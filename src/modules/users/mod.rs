pub mod model;
pub mod repository;

pub use self::model::{Role, User, UserResponse};
