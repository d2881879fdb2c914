use async_trait::async_trait;
use folio_core::{Article, ArticleId, Error, NewArticle, RecordStore, Result};
use reqwest::{Client, Response, StatusCode};
use std::fmt;

use crate::StoreConfig;

/// Record store reached over HTTP (`GET /blogs`, `GET /blogs/:id`, `POST /blogs`).
pub struct HttpStore {
    client: Client,
    config: StoreConfig,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}

impl fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStore")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.config.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let url = self.config.collection_url();
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let articles = Self::check_status(response)?.json::<Vec<Article>>().await?;
        Ok(articles)
    }

    async fn get_article(&self, id: ArticleId) -> Result<Article> {
        let url = self.config.record_url(&id.to_string());
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id));
        }
        let article = Self::check_status(response)?.json::<Article>().await?;
        Ok(article)
    }

    async fn create_article(&self, article: &NewArticle) -> Result<Article> {
        let url = self.config.collection_url();
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(article).send().await?;
        let created = Self::check_status(response)?.json::<Article>().await?;
        tracing::info!("📝 Created article {} ({})", created.id, created.title);
        Ok(created)
    }
}
