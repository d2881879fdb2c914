use std::fmt;

use crate::render::Painter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

/// Transient, non-blocking message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }

    pub fn render(&self, painter: &Painter) -> String {
        let line = self.to_string();
        match self.variant {
            Variant::Default => painter.success(&line),
            Variant::Destructive => painter.error(&line),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
