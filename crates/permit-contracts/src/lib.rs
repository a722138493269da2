//! # permit-contracts
//!
//! Shared types and error contracts for the permit authorization engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod action;
pub mod error;
pub mod grant;
pub mod role;
