pub mod chain;
pub mod errors;
pub mod models;
pub mod ports;

pub use chain::ProviderChain;
pub use errors::ProviderError;
pub use models::ProviderIdentity;
pub use ports::IdentityProvider;
