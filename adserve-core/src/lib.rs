#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod accrual;
pub mod bidding;
pub mod entities;
pub mod processors;
pub mod selection;
pub mod store;
