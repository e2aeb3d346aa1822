mod credentials;
mod dial_error;
mod resolver;
mod types;

pub use credentials::*;
pub use dial_error::*;
pub use resolver::*;
pub use types::*;
