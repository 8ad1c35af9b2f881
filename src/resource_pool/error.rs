use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourcePoolError {
    #[error(transparent)]
    Profile(#[from] crate::profile::ProfileError),
}
