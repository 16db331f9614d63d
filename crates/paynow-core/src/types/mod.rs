//! Core types used across the PayNow client.

mod common;
mod operation;

pub use common::*;
pub use operation::*;
