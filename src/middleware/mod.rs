pub mod admin;
pub mod request_id;

pub use admin::AdminToken;
pub use request_id::{CorrelationId, RequestId, RequestIdExt};
