//! Review aggregate

pub mod model;
pub mod repository;

pub use model::Review;
pub use repository::ReviewRepository;
