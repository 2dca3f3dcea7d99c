//! Application layer: domain logic behind the port traits.

pub mod alert;
pub mod events;
pub mod ports;
pub mod presence;
pub mod presenter;
pub mod service;
