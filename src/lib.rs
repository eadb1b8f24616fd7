//! Sagra
//!
//! Domain library for a festival ("sagra") food-ordering client: dish
//! catalog, cart, orders, availability rules and per-day reports. Pure
//! computation only: no I/O, no clock, no network. The companion
//! `sagra-app` crate wires these types to durable storage and the remote
//! ordering API.

pub mod availability;
pub mod cart;
pub mod catalog;
pub mod dates;
pub mod money;
pub mod orders;
pub mod reports;
