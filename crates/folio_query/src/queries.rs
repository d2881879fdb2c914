//! Record store reads bound to their query keys.

use folio_core::{Article, ArticleId, RecordStore};

use crate::{QueryCache, QueryKey, QueryState};

/// `["blogs"]` -> `GET /blogs`
pub async fn blogs(cache: &QueryCache, store: &dyn RecordStore) -> QueryState<Vec<Article>> {
    cache.fetch(QueryKey::blogs(), || store.list_articles()).await
}

/// `["blog", id]` -> `GET /blogs/{id}`
pub async fn blog(cache: &QueryCache, store: &dyn RecordStore, id: ArticleId) -> QueryState<Article> {
    cache.fetch(QueryKey::blog(id), || store.get_article(id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_core::NewArticle;
    use folio_storage::MemoryStore;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            description: "d".to_string(),
            category: vec![],
            date: Utc::now(),
            cover_image: String::new(),
            content: "c".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_refreshes_only_after_invalidation() {
        let store = MemoryStore::new();
        let cache = QueryCache::default();
        store.create_article(&new_article("First")).await.unwrap();

        assert_eq!(blogs(&cache, &store).await.data().map(Vec::len), Some(1));

        store.create_article(&new_article("Second")).await.unwrap();
        assert_eq!(blogs(&cache, &store).await.data().map(Vec::len), Some(1));

        cache.invalidate(&QueryKey::blogs()).await;
        assert_eq!(blogs(&cache, &store).await.data().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_missing_blog_is_error() {
        let store = MemoryStore::new();
        let cache = QueryCache::default();
        let state = blog(&cache, &store, ArticleId(3)).await;
        assert!(matches!(state.error(), Some(folio_core::Error::NotFound(ArticleId(3)))));
    }
}
