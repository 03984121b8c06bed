//! REST API layer: DTOs, handlers, routing and error mapping

pub mod dto;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod routes;

pub use routes::router;
