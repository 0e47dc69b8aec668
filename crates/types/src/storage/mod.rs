//! Storage records and traits for the persistence collaborator

pub mod errors;
pub mod records;
pub mod traits;

pub use errors::*;
pub use records::*;
pub use traits::*;

pub type StorageResult<T> = Result<T, StorageError>;
