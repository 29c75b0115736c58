// core/src/lib.rs

//! pix_checkout: the payment lifecycle of a PIX storefront.
//!
//! The crate creates PIX charges with the SigiloPay gateway, keeps a record of
//! the resulting orders and reconciles their status by polling the gateway:
//!  - [`gateway`] speaks the gateway's HTTP API and normalizes its status vocabulary.
//!  - [`store`] persists orders (Postgres, or in memory when no database is configured).
//!  - [`orchestrator`] exposes `create_payment` and `get_status`, neither of which fails across its boundary.
//!  - [`poller`] re-checks a transaction on a fixed cadence until it is terminal or cancelled.
//!  - [`catalog`] prices the fixed packages and custom amounts.

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod poller;
pub mod store;

pub use crate::catalog::{custom_package, find_package, packages, RobuxPackage};
pub use crate::config::GatewayConfig;
pub use crate::error::{CheckoutError, CheckoutResult};
pub use crate::gateway::{normalize_status, PixGateway, SigiloPayClient};
pub use crate::models::{
  BuyerInfo, CreatePaymentRequest, NewOrder, Order, OrderStatus, OrderSummary, PaymentCreated, PaymentResult,
  StatusRequest, StatusResult,
};
pub use crate::orchestrator::PaymentOrchestrator;
pub use crate::poller::{PollHandle, PollOutcome, PollerConfig, StatusSource};
pub use crate::store::{InMemoryOrderStore, OrderStore, PgOrderStore};
