//! Repositories for the authentication service

pub mod account;
pub mod session;

pub use account::AccountRepository;
pub use session::SessionRepository;
