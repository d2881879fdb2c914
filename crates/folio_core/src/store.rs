use async_trait::async_trait;

use crate::types::{Article, ArticleId, NewArticle};
use crate::Result;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Fetch the whole collection, in store order
    async fn list_articles(&self) -> Result<Vec<Article>>;

    /// Fetch a single article by id
    async fn get_article(&self, id: ArticleId) -> Result<Article>;

    /// Create an article; the store assigns the id
    async fn create_article(&self, article: &NewArticle) -> Result<Article>;
}
