use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use folio_core::{Article, Error, NewArticle, RecordStore, Result};
use folio_query::{QueryCache, QueryKey};
use tracing::{info, warn};

use crate::notification::Notification;
use crate::render::Painter;

/// Cover used when the author leaves the URL blank.
pub const COVER_IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/800x400";

pub const MSG_PUBLISHED: &str = "Article published successfully!";
pub const MSG_CREATE_FAILED: &str = "Failed to create article. Please try again.";
pub const MSG_REQUIRED: &str = "Please fill in all required fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Categories,
    Content,
    CoverImage,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Description,
        Field::Categories,
        Field::Content,
        Field::CoverImage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Categories => "categories",
            Field::Content => "content",
            Field::CoverImage => "cover image",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Categories => "Categories",
            Field::Content => "Content",
            Field::CoverImage => "Cover Image URL",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Field::Title => "Write an engaging title...",
            Field::Description => "Brief summary of your article...",
            Field::Categories => "e.g., Technology, Design, Business",
            Field::Content => "Write your article content here...",
            Field::CoverImage => "https://example.com/image.jpg",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Field::Title | Field::Description | Field::Content)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "title" => Ok(Field::Title),
            "description" => Ok(Field::Description),
            "categories" | "category" => Ok(Field::Categories),
            "content" => Ok(Field::Content),
            "coverimage" | "cover" => Ok(Field::CoverImage),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

/// Split on commas, trim, drop empty segments.
pub fn parse_categories(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw text as typed by the author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub description: String,
    pub categories: String,
    pub content: String,
    pub cover_image: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Categories => &self.categories,
            Field::Content => &self.content,
            Field::CoverImage => &self.cover_image,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Categories => self.categories = value,
            Field::Content => self.content = value,
            Field::CoverImage => self.cover_image = value,
        }
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        Field::ALL
            .iter()
            .filter(|field| field.is_required() && self.get(**field).trim().is_empty())
            .map(|field| field.name())
            .collect()
    }

    /// Build the record to POST, stamped with `now`.
    pub fn to_new_article(&self, now: DateTime<Utc>) -> Result<NewArticle> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(Error::Validation(missing));
        }

        let cover_image = match self.cover_image.trim() {
            "" => COVER_IMAGE_PLACEHOLDER.to_string(),
            url => url.to_string(),
        };

        Ok(NewArticle {
            title: self.title.clone(),
            description: self.description.clone(),
            category: parse_categories(&self.categories),
            date: now,
            cover_image,
            content: self.content.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// Result of asking the form to start a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Validated; the caller should send this record.
    Ready(NewArticle),
    /// Validation failed; nothing is sent.
    Rejected(Notification),
    /// A write is already in flight (the submit control is disabled).
    Busy,
}

/// The "new article" form.
///
/// `idle -> submitting -> success (cleared, closed) | error (kept, open)`,
/// then back to `idle`. The settled result stays in `outcome` until the form
/// is reopened.
#[derive(Debug, Clone)]
pub struct CreationForm {
    fields: FormFields,
    status: FormStatus,
    outcome: Option<FormStatus>,
    open: bool,
}

impl Default for CreationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::default(),
            status: FormStatus::Idle,
            outcome: None,
            open: false,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// `Success` or `Error` of the last settled submission.
    pub fn outcome(&self) -> Option<FormStatus> {
        self.outcome
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    pub fn open(&mut self) {
        if !self.is_submitting() {
            self.outcome = None;
        }
        self.open = true;
    }

    /// Close without submitting. Refused while a write is in flight.
    pub fn close(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.open = false;
        true
    }

    /// Edit a field. Ignored while a write is in flight.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if !self.is_submitting() {
            self.fields.set(field, value);
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Publishing..."
        } else {
            "Publish Article"
        }
    }

    /// Validate and move to `Submitting`.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Submission {
        if self.is_submitting() {
            return Submission::Busy;
        }
        match self.fields.to_new_article(now) {
            Ok(article) => {
                self.status = FormStatus::Submitting;
                Submission::Ready(article)
            }
            Err(err) => {
                warn!("Creation form rejected: {}", err);
                Submission::Rejected(Notification::error(MSG_REQUIRED))
            }
        }
    }

    /// Apply the store's answer to a submission started with [`begin_submit`].
    ///
    /// On success the collection query is invalidated, after the write has
    /// been acknowledged, so the list reloads on its next observation.
    ///
    /// [`begin_submit`]: CreationForm::begin_submit
    pub async fn finish_submit(&mut self, result: &Result<Article>, cache: &QueryCache) -> Notification {
        let notification = match result {
            Ok(article) => {
                info!("Published article {} ({})", article.id, article.title);
                cache.invalidate(&QueryKey::blogs()).await;
                self.fields = FormFields::default();
                self.outcome = Some(FormStatus::Success);
                self.open = false;
                Notification::success(MSG_PUBLISHED)
            }
            Err(err) => {
                warn!("Failed to publish article: {}", err);
                self.outcome = Some(FormStatus::Error);
                self.open = true;
                Notification::error(MSG_CREATE_FAILED)
            }
        };
        self.status = FormStatus::Idle;
        notification
    }

    /// Validate, write, and settle in one go.
    pub async fn submit(
        &mut self,
        store: &dyn RecordStore,
        cache: &QueryCache,
        now: DateTime<Utc>,
    ) -> (Notification, Option<Article>) {
        let article = match self.begin_submit(now) {
            Submission::Ready(article) => article,
            Submission::Rejected(notification) => return (notification, None),
            Submission::Busy => return (Notification::error("A submission is already in progress."), None),
        };

        let result = store.create_article(&article).await;
        let notification = self.finish_submit(&result, cache).await;
        (notification, result.ok())
    }

    pub fn render(&self, painter: &Painter) -> String {
        let mut out = vec![
            painter.title("Create New Article"),
            painter.muted("Share your thoughts with the world. Fill in the details and let your voice be heard."),
            String::new(),
        ];
        for field in Field::ALL {
            let marker = if field.is_required() { " *" } else { "" };
            let value = self.fields.get(field);
            let shown = if value.is_empty() {
                painter.muted(field.hint())
            } else {
                value.to_string()
            };
            out.push(format!("{}{}: {}", painter.heading(field.label()), marker, shown));
        }
        out.push(String::new());
        out.push(format!("[ Cancel ]  [ {} ]", self.submit_label()));
        out.join("\n")
    }
}
