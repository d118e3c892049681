pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::AccessClaims;
pub use roles::Role;
