//! Domain models for the merchant API.
//!
//! A deliberately small set: the gateway's many behavior-free request
//! DTOs are built ad hoc by callers; only objects with invariants worth
//! enforcing live here.

mod customer;
mod money;
mod order;
mod store;

pub use customer::Customer;
pub use money::{Currency, Money};
pub use order::Order;
pub use store::{Store, StoreCollection, StoreStatus};
