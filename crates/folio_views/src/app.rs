use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use folio_core::{Article, ArticleId, RecordStore};
use folio_query::{queries, QueryCache, QueryKey};

use crate::detail::{DetailContent, DetailView};
use crate::form::{CreationForm, Field};
use crate::list::{ListContent, ListView};
use crate::notification::Notification;
use crate::render::{Painter, ViewConfig};

pub const TAGLINE: &str = "Explore insights and stories";
pub const LIST_HEADING: &str = "Latest Articles";
pub const PLACEHOLDER_TITLE: &str = "Select an article";
pub const PLACEHOLDER_HINT: &str = "Choose from the list to begin reading";

/// Top-level composition: list, detail pane, creation form and toasts.
pub struct App {
    store: Arc<dyn RecordStore>,
    cache: Arc<QueryCache>,
    config: ViewConfig,
    list: ListView,
    selected: Option<ArticleId>,
    form: CreationForm,
    notifications: VecDeque<Notification>,
    last_list: ListContent,
}

impl App {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<QueryCache>, config: ViewConfig) -> Self {
        let list = ListView::new(config.store_hint.clone());
        Self {
            store,
            cache,
            config,
            list,
            selected: None,
            form: CreationForm::new(),
            notifications: VecDeque::new(),
            last_list: ListContent::Loading,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn painter(&self) -> Painter {
        Painter::new(self.config.color)
    }

    pub fn selected(&self) -> Option<ArticleId> {
        self.selected
    }

    pub fn select(&mut self, id: ArticleId) {
        self.selected = Some(id);
    }

    /// Select the card at `position` (zero based) of the last rendered list.
    pub fn select_position(&mut self, position: usize) -> Option<ArticleId> {
        let id = ListView::activate(&self.last_list, position)?;
        self.selected = Some(id);
        Some(id)
    }

    pub async fn list(&mut self) -> ListContent {
        let state = queries::blogs(&self.cache, self.store.as_ref()).await;
        let content = self.list.content(&state, self.selected);
        self.last_list = content.clone();
        content
    }

    pub async fn detail(&self) -> DetailContent {
        DetailView::load(&self.cache, self.store.as_ref(), self.selected).await
    }

    pub fn form(&self) -> &CreationForm {
        &self.form
    }

    pub fn open_form(&mut self) {
        self.form.open();
    }

    pub fn close_form(&mut self) -> bool {
        self.form.close()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Submit the creation form; the outcome is queued as a notification.
    pub async fn submit_form(&mut self, now: DateTime<Utc>) -> Option<Article> {
        let (notification, created) = self
            .form
            .submit(self.store.as_ref(), &self.cache, now)
            .await;
        self.notifications.push_back(notification);
        created
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Mark every query stale so the next render reloads.
    pub async fn refresh(&self) -> usize {
        self.cache.invalidate(&QueryKey::new(Vec::<String>::new())).await
    }

    pub fn render_header(&self) -> String {
        let painter = self.painter();
        format!("{}\n{}", painter.title(&self.config.brand), painter.muted(TAGLINE))
    }

    pub fn render_placeholder(&self) -> String {
        let painter = self.painter();
        format!("{}\n{}", painter.heading(PLACEHOLDER_TITLE), painter.muted(PLACEHOLDER_HINT))
    }

    /// Detail pane before its load answers. `None` when nothing is selected
    /// or the article is fresh in the cache.
    pub async fn pending_detail(&self) -> Option<DetailContent> {
        let id = self.selected?;
        let state = self.cache.snapshot::<Article>(&QueryKey::blog(id)).await;
        state.is_pending().then(|| DetailView::content(&state))
    }

    /// The screen as it stands before the store answers: skeletons where
    /// nothing is cached, the previous data where a reload is due. `None`
    /// when everything shown is fresh and [`render`](App::render) will not wait.
    pub async fn render_pending(&self) -> Option<String> {
        let list_state = self.cache.snapshot::<Vec<Article>>(&QueryKey::blogs()).await;
        let detail_state = match self.selected {
            Some(id) => Some(self.cache.snapshot::<Article>(&QueryKey::blog(id)).await),
            None => None,
        };
        let waiting = list_state.is_pending() || detail_state.as_ref().map_or(false, |state| state.is_pending());
        if !waiting {
            return None;
        }

        let list = self.list.content(&list_state, self.selected);
        let detail = detail_state.map_or(DetailContent::Empty, |state| DetailView::content(&state));
        Some(self.compose(&list, detail))
    }

    /// Header, list, then the detail pane (or its placeholder).
    pub async fn render(&mut self) -> String {
        let list = self.list().await;
        let detail = self.detail().await;
        self.compose(&list, detail)
    }

    fn compose(&self, list: &ListContent, detail: DetailContent) -> String {
        let painter = self.painter();
        let detail_text = match detail {
            DetailContent::Empty => self.render_placeholder(),
            other => DetailView::render(&other, &painter),
        };

        [
            self.render_header(),
            painter.rule(40),
            painter.heading(LIST_HEADING),
            self.list.render(list, &painter),
            painter.rule(40),
            detail_text,
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use folio_core::NewArticle;
    use folio_storage::MemoryStore;

    async fn seeded() -> App {
        let store = MemoryStore::new();
        for title in ["Alpha", "Beta"] {
            store
                .create_article(&NewArticle {
                    title: title.to_string(),
                    description: format!("About {}", title),
                    category: vec![],
                    date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
                    cover_image: String::new(),
                    content: format!("{} body", title),
                })
                .await
                .unwrap();
        }
        App::new(Arc::new(store), Arc::new(QueryCache::default()), ViewConfig::default())
    }

    #[tokio::test]
    async fn test_placeholder_until_selection() {
        let mut app = seeded().await;
        let screen = app.render().await;
        assert!(screen.contains("Latest Articles"));
        assert!(screen.contains(PLACEHOLDER_TITLE));

        assert_eq!(app.select_position(1), Some(ArticleId(2)));
        let screen = app.render().await;
        assert!(!screen.contains(PLACEHOLDER_TITLE));
        assert!(screen.contains("Beta body"));
    }

    #[tokio::test]
    async fn test_validation_failure_is_queued() {
        let mut app = seeded().await;
        app.open_form();
        app.set_field(Field::Title, "Only a title");
        assert!(app.submit_form(Utc::now()).await.is_none());

        let notes = app.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].is_error());
        assert!(app.form().is_open());
        assert!(app.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_pending_screen_before_first_load() {
        let mut app = seeded().await;
        let pending = app.render_pending().await.unwrap();
        assert!(pending.contains("░"));
        assert!(pending.contains(PLACEHOLDER_TITLE));

        app.render().await;
        assert!(app.render_pending().await.is_none());
    }

    #[tokio::test]
    async fn test_pending_screen_keeps_previous_data_after_refresh() {
        let mut app = seeded().await;
        app.select(ArticleId(1));
        app.render().await;
        assert!(app.pending_detail().await.is_none());

        assert_eq!(app.refresh().await, 2);
        let pending = app.render_pending().await.unwrap();
        assert!(pending.contains("Alpha"));
        assert!(!pending.contains("░"));

        app.select(ArticleId(2));
        assert_eq!(app.pending_detail().await, Some(DetailContent::Loading));
    }
}
