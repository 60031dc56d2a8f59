pub mod response;
pub mod urls;

pub use response::ErrorBody;
pub use urls::{UrlHandlers, json_config, url_routes};
