use std::fmt;

use folio_core::{ArticleId, COLLECTION};

/// Logical identity of a query, e.g. `["blogs"]` or `["blog", "7"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The whole collection.
    pub fn blogs() -> Self {
        Self::new([COLLECTION])
    }

    /// A single article.
    pub fn blog(id: ArticleId) -> Self {
        Self::new(["blog".to_string(), id.to_string()])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Prefix match, used by invalidation.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let blogs = QueryKey::blogs();
        let seven = QueryKey::blog(ArticleId(7));

        assert!(blogs.starts_with(&blogs));
        assert!(!seven.starts_with(&blogs));
        assert!(seven.starts_with(&QueryKey::new(["blog"])));
        assert!(seven.starts_with(&QueryKey::new(Vec::<String>::new())));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryKey::blogs().to_string(), "[blogs]");
        assert_eq!(QueryKey::blog(ArticleId(7)).to_string(), "[blog, 7]");
    }
}
