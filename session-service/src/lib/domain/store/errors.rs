use thiserror::Error;

use crate::domain::store::models::Collection;

/// Error for document store operations.
///
/// Represents failures of the underlying store; the adapter attaches no
/// business meaning to them.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Duplicate key in {collection}: {detail}")]
    DuplicateKey {
        collection: Collection,
        detail: String,
    },

    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Document (de)serialization failed: {0}")]
    Serialization(String),
}
