//! Credential and session backend.
//!
//! The domain ([`domain::auth`]) owns registration, login, authorization and
//! logout on top of a generic [`domain::store::DocumentStore`]. Adapters for
//! PostgreSQL and an in-process map live in [`outbound::stores`]; the HTTP
//! transport lives in [`inbound::http`].

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::store;
pub use outbound::stores;
