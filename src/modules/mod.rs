pub mod auth;
pub mod users;

pub use self::auth::Claims;
pub use self::users::model::User;
