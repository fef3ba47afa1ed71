pub mod models;
pub mod ports;
pub mod service;

pub use models::Identity;
pub use models::SignUpCommand;
pub use models::StaticIdentity;
pub use models::StaticIdentitySet;
pub use models::Token;
pub use ports::AuthServicePort;
pub use ports::IdentityRepository;
pub use service::AuthService;
pub use service::AuthSettings;
