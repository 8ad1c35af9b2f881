//! Resource Pool: a thin façade over the availability profile (spec.md §2).

mod error;
mod pool;

pub use error::ResourcePoolError;
pub use pool::ResourcePool;
