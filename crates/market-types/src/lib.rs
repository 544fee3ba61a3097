//! Common types for the event merchandise marketplace client.
//!
//! This crate mirrors the resources exposed by the marketplace backend
//! (users, companies, events, auctions, requirements, offers and orders)
//! and provides the client-side validation applied to form input before
//! anything is submitted.

/// Shared API envelope types such as error bodies and pagination.
pub mod api;
/// Authentication, user and role types.
pub mod auth;
/// Company and product catalogue types.
pub mod company;
/// Event, auction and requirement types.
pub mod event;
/// Offer and order types.
pub mod order;
/// Client-side form validation.
pub mod validation;

pub use api::{ApiErrorBody, ErrorMessage, MessageResponse, Paginated};
pub use auth::{
	AuthResponse, CreateRoleRequest, CreateUserRequest, LoginRequest, RefreshTokenRequest, Role,
	TokenPair, UpdateRoleRequest, UpdateUserRequest, User,
};
pub use company::{
	Company, CreateCompanyRequest, CreateProductRequest, Product, ProductDraft, ProductOptions,
	UpdateCompanyRequest, UpdateProductRequest,
};
pub use event::{
	Auction, AuctionStatus, CreateAuctionRequest, CreateEventRequest, CreateRequirementRequest,
	Event, ProductType, Requirement, RequirementDraft, SpecMap, UpdateEventRequest,
	UpdateRequirementRequest,
};
pub use order::{
	AcceptOfferRequest, CreateOfferRequest, CreateOrderRequest, Offer, OfferStatus, Order,
	RejectOfferRequest, UpdateOfferRequest, UpdateOrderStatusRequest,
};
pub use validation::ValidationError;
