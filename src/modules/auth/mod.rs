pub mod controller;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;

pub use self::model::Claims;
pub use self::service::AuthService;
