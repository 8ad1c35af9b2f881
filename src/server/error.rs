use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server capacity must be >= 1, got {0}")]
    InvalidCapacity(i64),

    #[error(transparent)]
    Pool(#[from] crate::resource_pool::ResourcePoolError),

    #[error(transparent)]
    Kernel(#[from] crate::kernel::KernelError),
}
