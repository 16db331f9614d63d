//! PayNow core library.
//!
//! Core types and functionality for the VeriTrans4G PayNow PayPay API:
//! request validation, canonical hash signing, endpoint resolution and
//! response classification. Network I/O is left to a [`client::Transport`].

pub mod client;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod params;
pub mod response;
pub mod signing;
pub mod types;
pub mod utils;
pub mod validation;
