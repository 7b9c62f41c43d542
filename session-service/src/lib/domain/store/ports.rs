use async_trait::async_trait;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::Collection;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;

/// Narrow persistence surface over a document-oriented store.
///
/// Every operation is parameterized by collection and filtered by a
/// conjunction of field predicates.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Count documents matching the filter.
    ///
    /// # Arguments
    /// * `collection` - Collection to query
    /// * `filter` - Conjunction of field predicates
    ///
    /// # Returns
    /// Number of matching documents
    ///
    /// # Errors
    /// * `Connection` - Store is unreachable
    /// * `Query` - Query execution failed
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Retrieve one document matching the filter.
    ///
    /// # Arguments
    /// * `collection` - Collection to query
    /// * `filter` - Conjunction of field predicates
    ///
    /// # Returns
    /// Optional document (None if nothing matches)
    ///
    /// # Errors
    /// * `Connection` - Store is unreachable
    /// * `Query` - Query execution failed
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Persist a new document.
    ///
    /// # Arguments
    /// * `collection` - Target collection
    /// * `document` - Document to insert
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `DuplicateKey` - A unique field value already exists
    /// * `Connection` - Store is unreachable
    /// * `Query` - Insert failed
    async fn insert_one(&self, collection: Collection, document: Document)
        -> Result<(), StoreError>;

    /// Remove at most one document matching the filter.
    ///
    /// # Returns
    /// Number of deleted documents (0 or 1)
    ///
    /// # Errors
    /// * `Connection` - Store is unreachable
    /// * `Query` - Delete failed
    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Remove every document matching the filter.
    ///
    /// # Returns
    /// Number of deleted documents
    ///
    /// # Errors
    /// * `Connection` - Store is unreachable
    /// * `Query` - Delete failed
    async fn delete_many(&self, collection: Collection, filter: &Filter)
        -> Result<u64, StoreError>;
}
