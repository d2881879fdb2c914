use crossterm::style::Stylize;

/// Settings shared by every view.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Emit ANSI colors and attributes
    pub color: bool,
    /// Title shown in the header
    pub brand: String,
    /// Where the record store is expected, for the list error hint
    pub store_hint: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            color: false,
            brand: "Folio".to_string(),
            store_hint: "port 3001".to_string(),
        }
    }
}

/// Turns text into (optionally) styled terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn title(&self, text: &str) -> String {
        if self.color {
            text.bold().magenta().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn muted(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn highlight(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    /// `[a] [b]`
    pub fn badges(&self, tags: &[String]) -> String {
        tags.iter()
            .map(|tag| {
                let badge = format!("[{}]", tag);
                if self.color {
                    badge.magenta().to_string()
                } else {
                    badge
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn rule(&self, width: usize) -> String {
        self.muted(&"─".repeat(width))
    }
}
