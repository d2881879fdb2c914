use folio_core::{Article, ArticleId, RecordStore};
use folio_query::{queries, QueryCache, QueryState};

use crate::render::Painter;

pub const DETAIL_ERROR: &str = "Failed to load article details.";

/// Everything the detail pane shows for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDetail {
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    pub cover: String,
    pub published: String,
    pub read_time: String,
    pub tags: Vec<String>,
    pub content: String,
}

impl From<&Article> for ArticleDetail {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            description: article.description.clone(),
            cover: article.cover_or_placeholder().to_string(),
            published: article.long_date(),
            read_time: article.read_time(),
            tags: article.category.clone(),
            content: article.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent {
    /// Nothing selected; the caller shows its own placeholder.
    Empty,
    Loading,
    Failed,
    Article(ArticleDetail),
}

pub struct DetailView;

impl DetailView {
    /// Fetch and shape the selected article. Never reuses list data: a
    /// failed load is a failure even if the summary is cached.
    pub async fn load(cache: &QueryCache, store: &dyn RecordStore, selected: Option<ArticleId>) -> DetailContent {
        match selected {
            None => DetailContent::Empty,
            Some(id) => Self::content(&queries::blog(cache, store, id).await),
        }
    }

    pub fn content(state: &QueryState<Article>) -> DetailContent {
        match state {
            QueryState::Pending { previous: None } => DetailContent::Loading,
            QueryState::Pending { previous: Some(article) } | QueryState::Success(article) => {
                DetailContent::Article(ArticleDetail::from(article))
            }
            QueryState::Error(_) => DetailContent::Failed,
        }
    }

    pub fn render(content: &DetailContent, painter: &Painter) -> String {
        match content {
            DetailContent::Empty => String::new(),
            DetailContent::Loading => painter.muted("Loading article..."),
            DetailContent::Failed => painter.error(&format!("! {}", DETAIL_ERROR)),
            DetailContent::Article(detail) => render_article(detail, painter),
        }
    }
}

fn render_article(detail: &ArticleDetail, painter: &Painter) -> String {
    let mut out = vec![
        painter.muted(&format!("Cover: {}", detail.cover)),
        String::new(),
        painter.title(&detail.title),
        detail.description.clone(),
        painter.rule(24),
        format!(
            "{} {}   {} {}",
            painter.muted("PUBLISHED"),
            detail.published,
            painter.muted("READ TIME"),
            detail.read_time
        ),
    ];
    if !detail.tags.is_empty() {
        out.push(painter.badges(&detail.tags));
    }
    out.push(String::new());
    out.push(detail.content.clone());
    out.push(String::new());
    out.push(painter.rule(24));
    out.push(painter.muted("ENJOYED THIS ARTICLE?"));
    out.push(painter.heading("Share with your network"));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use folio_core::Error;
    use std::sync::Arc;

    fn article() -> Article {
        Article {
            id: ArticleId(7),
            title: "Seven".to_string(),
            description: "Lucky".to_string(),
            category: vec!["LUCK".to_string(), "MATH".to_string(), "FUN".to_string()],
            date: Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap(),
            cover_image: None,
            content: vec!["word"; 400].join(" "),
        }
    }

    #[test]
    fn test_article_detail_fields() {
        let content = DetailView::content(&QueryState::Success(article()));
        let DetailContent::Article(detail) = &content else {
            panic!("expected an article, got {:?}", content);
        };
        assert_eq!(detail.read_time, "2 min");
        assert_eq!(detail.published, "March 7, 2026");
        assert_eq!(detail.tags.len(), 3);
        assert!(detail.cover.starts_with("/placeholder.svg"));

        let text = DetailView::render(&content, &Painter::plain());
        assert!(text.contains("Seven"));
        assert!(text.contains("READ TIME 2 min"));
        assert!(text.contains("[LUCK] [MATH] [FUN]"));
    }

    #[test]
    fn test_failure_and_loading() {
        let failed = DetailView::content(&QueryState::Error(Arc::new(Error::NotFound(ArticleId(7)))));
        assert_eq!(failed, DetailContent::Failed);
        assert_eq!(DetailView::render(&failed, &Painter::plain()), "! Failed to load article details.");

        let loading = DetailView::content(&QueryState::Pending { previous: None });
        assert_eq!(loading, DetailContent::Loading);
    }

    #[tokio::test]
    async fn test_nothing_selected_renders_nothing() {
        let cache = QueryCache::default();
        let store = folio_storage::MemoryStore::new();
        let content = DetailView::load(&cache, &store, None).await;
        assert_eq!(content, DetailContent::Empty);
        assert!(DetailView::render(&content, &Painter::plain()).is_empty());
    }
}
