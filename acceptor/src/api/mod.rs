//! HTTP surface of the acceptor
//!
//! This module is responsible for:
//! - Rendering the authentication page for every request
//! - Initializing the router and its rate limits
//! - Providing documentation through the endpoints listing

/// Route handlers
pub mod handlers;

/// Endpoint documentation
pub mod index;

/// Router initialization and configuration
pub mod init;

/// HTML and JSON rendering of authentication decisions
pub mod page;

pub use init::initialize_router;
