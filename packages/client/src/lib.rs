//! Client side synchronization with a mortgage ledger
//!
//! A [`Session`](session::Session) keeps an immutable [`ClientView`](view::ClientView)
//! of the ledger in sync through an injected [`Provider`](provider::Provider),
//! reacts to wallet notifications, and submits the loan repayment.

pub mod config;
pub mod display;
pub mod error;
pub mod identity;
pub mod ledger;
#[cfg(feature = "localnet")]
pub mod localnet;
pub mod payment;
pub mod provider;
pub mod role;
pub mod schedule;
pub mod session;
pub mod view;
