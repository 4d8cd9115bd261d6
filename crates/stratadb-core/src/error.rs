use crate::{driver::DriverError, model::MetadataError};
use thiserror::Error as ThisError;

///
/// PersistError
///
/// Top-level fault surface for SQL generation. Every variant is a caller
/// error or collaborator fault; generation itself is a pure function of
/// metadata state and never retries.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PersistError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}
