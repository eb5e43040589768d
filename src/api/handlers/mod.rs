//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one proxied TMDB resource.

pub mod configuration;
pub mod health;
pub mod movie;
pub mod search;

pub use configuration::configuration_handler;
pub use health::health_handler;
pub use movie::movie_handler;
pub use search::search_handler;
