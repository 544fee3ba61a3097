//! Typed wrappers over the backend REST endpoints.
//!
//! Each method maps to exactly one HTTP call through the shared
//! [`ApiClient`](crate::api::ApiClient). Services never write the session;
//! they only read the current user where an endpoint needs it.

pub mod auth;
pub mod companies;
pub mod events;
pub mod orders;

pub use auth::AuthService;
pub use companies::CompaniesService;
pub use events::EventsService;
pub use orders::OrdersService;
