//! Multi-call flows behind the client's main screens
//!
//! Each flow validates its input before the first request is sent, then
//! drives the services in the order the backend expects.

pub mod dashboard;
pub mod publish;
pub mod requirements;

pub use dashboard::{ClientDashboard, ClientOrder, DashboardOps, OrderProgress};
pub use publish::{OrderRequestForm, PublishOps, PublishedOrder};
pub use requirements::{RequirementForm, RequirementOps};
