//! Listings module: catalogue, listing CRUD, reviews and booking requests

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
