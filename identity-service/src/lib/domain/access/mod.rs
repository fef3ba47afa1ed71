pub mod models;
pub mod ports;
pub mod service;

pub use models::AccessControlEntry;
pub use models::CreateAccessEntryCommand;
pub use ports::AccessRepository;
pub use ports::AccessServicePort;
pub use service::AccessService;
