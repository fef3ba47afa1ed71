pub mod access;
pub mod identity;

pub use access::InMemoryAccessRepository;
pub use identity::InMemoryIdentityRepository;
