//! Client core for a household product stash: domain model, wire DTOs, and the
//! `ProductService` port with its HTTP and in-memory adapters.
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
