// core/src/models/mod.rs

//! Domain records shared by the gateway client, the order store and the orchestrator.

pub mod checkout;
pub mod order;

pub use checkout::{BuyerInfo, CreatePaymentRequest, PaymentCreated, PaymentResult, StatusRequest, StatusResult};
pub use order::{NewOrder, Order, OrderStatus, OrderSummary};
