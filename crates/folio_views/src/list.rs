use folio_core::{Article, ArticleId};
use folio_query::QueryState;

use crate::render::Painter;

/// Tags shown on a summary card.
pub const CARD_TAG_LIMIT: usize = 2;

/// Placeholder cards rendered while the collection loads.
pub const SKELETON_CARDS: usize = 3;

/// Selectable summary of one article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date: String,
    pub selected: bool,
}

impl ArticleCard {
    pub fn new(article: &Article, selected: Option<ArticleId>) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            description: article.description.clone(),
            tags: article.category.iter().take(CARD_TAG_LIMIT).cloned().collect(),
            date: article.short_date(),
            selected: selected == Some(article.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListContent {
    Loading,
    Failed(String),
    Cards(Vec<ArticleCard>),
}

impl ListContent {
    pub fn cards(&self) -> &[ArticleCard] {
        match self {
            Self::Cards(cards) => cards,
            _ => &[],
        }
    }
}

/// Collection of articles as selectable cards, in the order the store returned them.
#[derive(Debug, Clone)]
pub struct ListView {
    store_hint: String,
}

impl ListView {
    pub fn new(store_hint: impl Into<String>) -> Self {
        Self {
            store_hint: store_hint.into(),
        }
    }

    pub fn error_message(&self) -> String {
        format!(
            "Failed to load articles. Ensure JSON Server is running on {}.",
            self.store_hint
        )
    }

    pub fn content(&self, state: &QueryState<Vec<Article>>, selected: Option<ArticleId>) -> ListContent {
        match state {
            QueryState::Error(_) => ListContent::Failed(self.error_message()),
            QueryState::Pending { previous: None } => ListContent::Loading,
            QueryState::Pending { previous: Some(articles) } | QueryState::Success(articles) => {
                ListContent::Cards(articles.iter().map(|a| ArticleCard::new(a, selected)).collect())
            }
        }
    }

    /// Id behind the card at `position` (zero based), reported to the caller
    /// as the new selection.
    pub fn activate(content: &ListContent, position: usize) -> Option<ArticleId> {
        content.cards().get(position).map(|card| card.id)
    }

    pub fn render(&self, content: &ListContent, painter: &Painter) -> String {
        match content {
            ListContent::Loading => (0..SKELETON_CARDS)
                .map(|_| painter.muted("  ░░░░░░░░░░░░░░░░░░░░"))
                .collect::<Vec<_>>()
                .join("\n"),
            ListContent::Failed(message) => painter.error(&format!("! {}", message)),
            ListContent::Cards(cards) if cards.is_empty() => painter.muted("No articles yet."),
            ListContent::Cards(cards) => cards
                .iter()
                .enumerate()
                .map(|(i, card)| render_card(i + 1, card, painter))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

fn render_card(position: usize, card: &ArticleCard, painter: &Painter) -> String {
    let marker = if card.selected { ">" } else { " " };
    let title = if card.selected {
        painter.highlight(&card.title)
    } else {
        painter.heading(&card.title)
    };
    let mut lines = vec![
        format!("{} {:>2}. {}", marker, position, title),
        format!("      {}", card.description),
    ];
    if !card.tags.is_empty() {
        lines.push(format!("      {}", painter.badges(&card.tags)));
    }
    lines.push(format!("      {}", painter.muted(&card.date)));
    lines.join("\n")
}
