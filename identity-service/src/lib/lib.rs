//! Identity and access core.
//!
//! Local sign-up/sign-in with policy-checked, hashed passwords; signed
//! bearer tokens; sign-in through an external identity provider with an
//! unverified-claims fallback; and a rule-based access-control check over
//! `(identity, role, resource, payload)`.
//!
//! [`bootstrap::build`] wires everything from a [`config::Config`].

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use domain::access;
pub use domain::identity;
pub use domain::provider;
