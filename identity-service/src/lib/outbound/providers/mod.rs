pub mod local;
pub mod unverified_claims;

pub use local::LocalTokenProvider;
pub use unverified_claims::UnverifiedClaimsProvider;
