//! Standard Workload Format reader, a collaborator of [`crate::server`].

mod error;
mod swf;

pub use error::WorkloadError;
pub use swf::{read_swf, WorkloadRecord};
