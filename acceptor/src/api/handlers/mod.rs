//! Request handlers for the acceptor.

pub mod authenticate; // Authentication page served for every unrouted request
pub mod health;

pub(crate) use authenticate::authenticate_request;
pub(crate) use health::health_check;
