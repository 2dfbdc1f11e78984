//! Route handlers, one per URL and method.
//!
//! Each handler opens `QaStorage` over its request transaction, resolves the
//! viewer, checks the role it needs, and either renders a page or redirects.

pub mod account;
pub mod admin;
pub mod pages;
pub mod questions;
