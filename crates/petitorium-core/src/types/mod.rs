//! Contract types shared by the host and by plugins.

pub mod hook;
pub mod placeholder;
pub mod request;
pub mod response;

pub use hook::{DispatchPolicy, HookType};
pub use placeholder::{PLACEHOLDER, placeholder_names};
pub use request::RequestData;
pub use response::ResponseData;
