pub mod access_log;
pub mod errors;
pub mod json_body;
pub mod protect;
pub mod response;
pub mod security_headers;

pub use access_log::access_log;
pub use errors::{report_errors, ProtectionFailure};
pub use json_body::json_body;
pub use protect::protect_middleware;
pub use response::{ApiResponse, ApiResult};
pub use security_headers::security_headers;
