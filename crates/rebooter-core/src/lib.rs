pub mod config;
pub mod logging;

pub mod hook;
pub mod promote;
pub mod redirect;
pub mod request;
pub mod restorer;
pub mod upload_path;

pub use hook::NotFoundHook;
pub use restorer::{Outcome, Restorer, Skip};
