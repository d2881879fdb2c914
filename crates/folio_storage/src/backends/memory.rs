use async_trait::async_trait;
use folio_core::{Article, ArticleId, Error, NewArticle, RecordStore, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Records in insertion order. New ids are one past the largest existing id.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    articles: Vec<Article>,
}

impl MemoryCollection {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    fn next_id(&self) -> Result<ArticleId> {
        let max = self.articles.iter().map(|a| a.id.0).max().unwrap_or(0);
        max.checked_add(1)
            .map(ArticleId)
            .ok_or_else(|| Error::Storage(format!("No id left after {}", max)))
    }

    pub fn list(&self) -> Vec<Article> {
        self.articles.clone()
    }

    pub fn get(&self, id: ArticleId) -> Option<Article> {
        self.articles.iter().find(|a| a.id == id).cloned()
    }

    pub fn insert(&mut self, article: &NewArticle) -> Result<Article> {
        let created = Article::from_new(self.next_id()?, article.clone());
        self.articles.push(created.clone());
        Ok(created)
    }
}

/// In-process record store. Clones share the same collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collection: Arc<RwLock<MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            collection: Arc::new(RwLock::new(MemoryCollection::new(articles))),
        }
    }

    /// Load a json-server style document: `{"blogs": [...]}` or a bare array.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let records = match value {
            serde_json::Value::Object(mut map) => map
                .remove(folio_core::COLLECTION)
                .ok_or_else(|| Error::Storage(format!("Seed has no \"{}\" collection", folio_core::COLLECTION)))?,
            array @ serde_json::Value::Array(_) => array,
            _ => return Err(Error::Storage("Seed must be an object or an array".to_string())),
        };
        let articles: Vec<Article> = serde_json::from_value(records)?;
        Ok(Self::with_articles(articles))
    }

    pub async fn len(&self) -> usize {
        self.collection.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let collection = self.collection.read().await;
        Ok(collection.list())
    }

    async fn get_article(&self, id: ArticleId) -> Result<Article> {
        let collection = self.collection.read().await;
        collection.get(id).ok_or(Error::NotFound(id))
    }

    async fn create_article(&self, article: &NewArticle) -> Result<Article> {
        let mut collection = self.collection.write().await;
        let created = collection.insert(article)?;
        tracing::debug!("Stored article {} in memory", created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            description: "Test description".to_string(),
            category: vec!["TEST".to_string()],
            date: Utc::now(),
            cover_image: "https://via.placeholder.com/800x400".to_string(),
            content: "This is a test article.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        let first = store.create_article(&new_article("First")).await.unwrap();
        let second = store.create_article(&new_article("Second")).await.unwrap();
        assert_eq!(first.id, ArticleId(1));
        assert_eq!(second.id, ArticleId(2));

        let all = store.list_articles().await.unwrap();
        let titles: Vec<_> = all.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);

        let fetched = store.get_article(ArticleId(2)).await.unwrap();
        assert_eq!(fetched, second);
    }

    #[tokio::test]
    async fn test_missing_article() {
        let store = MemoryStore::new();
        let err = store.get_article(ArticleId(9)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ArticleId(9))));
    }

    #[tokio::test]
    async fn test_ids_continue_after_seed() {
        let seed = r#"{"blogs": [
            {"id": "4", "title": "a", "description": "b", "date": "2026-01-01T00:00:00Z", "content": "c"},
            {"id": 2, "title": "d", "description": "e", "date": "2026-01-02T00:00:00Z", "content": "f"}
        ]}"#;
        let store = MemoryStore::from_json(seed).unwrap();
        assert_eq!(store.len().await, 2);

        let created = store.create_article(&new_article("Next")).await.unwrap();
        assert_eq!(created.id, ArticleId(5));
    }

    #[tokio::test]
    async fn test_exhausted_ids_are_an_error() {
        let seed = format!(
            r#"[{{"id": {}, "title": "a", "description": "b", "date": "2026-01-01T00:00:00Z", "content": "c"}}]"#,
            u64::MAX
        );
        let store = MemoryStore::from_json(&seed).unwrap();

        let err = store.create_article(&new_article("Overflow")).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_seed_without_collection() {
        assert!(matches!(MemoryStore::from_json(r#"{"posts": []}"#), Err(Error::Storage(_))));
        assert!(MemoryStore::from_json("[]").is_ok());
    }
}
