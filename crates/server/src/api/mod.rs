pub mod cache;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pokemon;
pub mod routes;

pub use error::ErrorResponse;
pub use routes::create_router;
