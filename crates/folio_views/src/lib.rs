pub mod app;
pub mod detail;
pub mod form;
pub mod list;
pub mod notification;
pub mod render;

pub use app::App;
pub use detail::{ArticleDetail, DetailContent, DetailView};
pub use form::{parse_categories, CreationForm, Field, FormFields, FormStatus, Submission};
pub use list::{ArticleCard, ListContent, ListView};
pub use notification::{Notification, Variant};
pub use render::{Painter, ViewConfig};

pub mod prelude {
    pub use super::{App, CreationForm, DetailView, ListView, Notification, Painter, ViewConfig};
    pub use folio_core::{Article, ArticleId, Error, Result};
}
