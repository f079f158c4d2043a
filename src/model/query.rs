//! What a caller is looking for in the spool.

use serde::{Deserialize, Serialize};

/// An expected subject plus the fragments that must all appear in the body.
///
/// Fragment order is irrelevant. Duplicates are kept and each one is
/// checked on its own against the same content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
    /// Exact, case-sensitive subject.
    pub subject: String,

    /// Substrings required in the extracted content.
    pub fragments: Vec<String>,
}

impl MatchQuery {
    /// Query with a subject and no fragments.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            fragments: Vec::new(),
        }
    }

    /// Add a required fragment.
    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragments.push(fragment.into());
        self
    }

    /// Add several required fragments.
    pub fn fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.extend(fragments.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_duplicates_in_order() {
        let q = MatchQuery::new("Welcome")
            .fragment("Hi")
            .fragments(["Click", "Hi"]);
        assert_eq!(q.subject, "Welcome");
        assert_eq!(q.fragments, vec!["Hi", "Click", "Hi"]);
    }
}
