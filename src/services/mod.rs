//! Service layer for business logic

mod url_service;

pub use url_service::*;
