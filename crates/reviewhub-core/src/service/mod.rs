//! Client-side application services built on top of the ports.

pub mod auth;
pub mod client;
pub mod invalidation;
pub mod mutation;
pub mod scope;
pub mod session;

pub use auth::{LoginOutcome, login};
pub use client::ReviewClient;
pub use invalidation::{Dependent, INVALIDATION_TABLE, Invalidation, KeyFamily, QueryKey};
pub use mutation::{MutationOutcome, MutationStatus, MutationTracker, PendingMutation, Route};
pub use scope::ViewScope;
pub use session::{SESSION_STORAGE_KEY, SessionStore};
