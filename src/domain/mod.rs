pub mod error;
pub mod token;

pub use error::{ServiceError, ServiceResult};
