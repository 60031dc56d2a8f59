pub mod identity;
pub mod request_context;

pub use identity::CallerIdentity;
pub use request_context::RequestContext;
