use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::Collection;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;
use crate::domain::store::ports::DocumentStore;

/// Process-local document store.
///
/// Unique fields are checked and the document appended under one write lock,
/// so concurrent duplicate inserts cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map_or(0, |documents| documents.iter().filter(|d| filter.matches(d)).count());

        Ok(count as u64)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        for field in collection.unique_fields() {
            let Some(value) = document.get(*field) else {
                continue;
            };
            if documents.iter().any(|existing| existing.get(*field) == Some(value)) {
                return Err(StoreError::DuplicateKey {
                    collection,
                    detail: format!("{} already exists", field),
                });
            }
        }

        documents.push(document);
        Ok(())
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };

        match documents.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|d| !filter.matches(d));
        Ok((before - documents.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;
    use serde_json::json;
    use serde_json::Value;

    use super::*;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryDocumentStore::new();

        store
            .insert_one(
                Collection::Users,
                document(json!({ "username": "alice_wonder", "password_hash": "h" })),
            )
            .await
            .unwrap();

        let filter = Filter::new().eq("username", "alice_wonder");
        let found = store.find_one(Collection::Users, &filter).await.unwrap();
        assert_eq!(
            found.and_then(|d| d.get("password_hash").cloned()),
            Some(json!("h"))
        );

        // Collections are isolated
        let found = store.find_one(Collection::Sessions, &filter).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_unique_field_enforced() {
        let store = InMemoryDocumentStore::new();
        let user = document(json!({ "username": "alice_wonder", "password_hash": "h" }));

        store.insert_one(Collection::Users, user.clone()).await.unwrap();
        let result = store.insert_one(Collection::Users, user).await;

        assert!(matches!(
            result,
            Err(StoreError::DuplicateKey {
                collection: Collection::Users,
                ..
            })
        ));
        assert_eq!(
            store.count(Collection::Users, &Filter::new()).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_one_removes_single_match() {
        let store = InMemoryDocumentStore::new();
        for token in ["a", "b"] {
            store
                .insert_one(
                    Collection::Sessions,
                    document(json!({ "username": "alice_wonder", "session_token": token })),
                )
                .await
                .unwrap();
        }

        let filter = Filter::new().eq("username", "alice_wonder");
        assert_eq!(store.delete_one(Collection::Sessions, &filter).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Sessions, &filter).await.unwrap(), 1);

        let missing = Filter::new().eq("username", "nobody_here");
        assert_eq!(store.delete_one(Collection::Sessions, &missing).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_many_by_expiry() {
        let store = InMemoryDocumentStore::new();
        let now = Utc::now();

        for (token, expires_at) in [
            ("expired", now - Duration::hours(1)),
            ("live", now + Duration::hours(1)),
        ] {
            store
                .insert_one(
                    Collection::Sessions,
                    document(json!({ "session_token": token, "expires_at": expires_at })),
                )
                .await
                .unwrap();
        }

        let deleted = store
            .delete_many(Collection::Sessions, &Filter::new().lt("expires_at", now))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let remaining = store
            .find_one(Collection::Sessions, &Filter::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(remaining.get("session_token"), Some(&json!("live")));
    }
}
