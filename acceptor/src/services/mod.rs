pub mod aws_sts;
pub mod gcp_sts;
pub mod validation;

pub use validation::authenticate;
