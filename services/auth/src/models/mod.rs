//! Models for the authentication service

pub mod account;
pub mod session;

pub use account::{Account, LoginCredentials, NewAccount};
pub use session::{NewSession, Session};
