//! Contracts with the external loan backend.
//!
//! - **graphql** — the fetch-loans query and its wire types
//! - **rest** — the record-payment command
//! - **backend** — the [`backend::LoanBackend`] seam both go through
//! - **memory** — an in-memory backend for tests, demos and the CLI

pub mod backend;
pub mod graphql;
pub mod memory;
pub mod rest;
