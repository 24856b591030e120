pub mod handlers;
pub mod middleware;
pub mod provider;
pub mod routes;

pub use routes::create_router;
