pub mod service;

pub use service::{LaunchContext, ServiceLayer};
