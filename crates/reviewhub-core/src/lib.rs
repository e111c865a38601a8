//! # Reviewhub Core
//!
//! The domain layer of reviewhub.
//! This crate contains the review/comment model, the query pipeline and the
//! client-side application services, with zero infrastructure dependencies.
//! Everything that talks to the outside world goes through [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod service;

pub use error::{CredentialError, DomainError, DomainResult, WriteAction};
