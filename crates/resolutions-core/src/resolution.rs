//! The Resolution entity and the request/response shapes around it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a resolution, assigned by the store
pub type ResolutionId = i64;

/// A resolution record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Unique, never reused within the process lifetime
    pub id: ResolutionId,

    /// Trimmed, never empty
    pub title: String,

    /// Completion flag
    pub is_done: bool,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Absent until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resolution {
    /// Create a fresh, not-done resolution stamped with the current time
    pub fn new(id: ResolutionId, title: &str) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            is_done: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Replace title and completion flag, stamping `updated_at`
    pub fn apply_update(&mut self, title: &str, is_done: bool) {
        self.title = title.trim().to_string();
        self.is_done = is_done;
        self.updated_at = Some(Utc::now());
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Body of a create request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResolution {
    /// Required, non-blank
    #[serde(default)]
    pub title: Option<String>,
}

impl CreateResolution {
    /// Create request with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Body of an update request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResolution {
    /// Must match the route id
    #[serde(default)]
    pub id: Option<ResolutionId>,

    /// Required, non-blank
    #[serde(default)]
    pub title: Option<String>,

    /// Replaces the stored flag verbatim
    #[serde(default)]
    pub is_done: bool,
}

impl UpdateResolution {
    /// Update request carrying all three fields
    pub fn new(id: ResolutionId, title: impl Into<String>, is_done: bool) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
            is_done,
        }
    }
}

/// Query parameters of a list request
///
/// Both fields stay raw strings; the handler owns their parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    /// `true` or `false`, case-insensitive
    #[serde(default)]
    pub is_done: Option<String>,

    /// Case-insensitive substring of the title
    #[serde(default)]
    pub title: Option<String>,
}

impl ListFilter {
    /// Empty filter, matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the completion flag
    pub fn with_is_done(mut self, is_done: impl Into<String>) -> Self {
        self.is_done = Some(is_done.into());
        self
    }

    /// Filter on a title substring
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build a filter from raw query pairs
    ///
    /// Keys match ASCII case-insensitively. A repeated key keeps every
    /// value, joined with `,` in arrival order. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::new();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                k if k.eq_ignore_ascii_case("isDone") => &mut filter.is_done,
                k if k.eq_ignore_ascii_case("title") => &mut filter.title,
                _ => continue,
            };
            let value = value.into();
            *slot = Some(match slot.take() {
                Some(mut joined) => {
                    joined.push(',');
                    joined.push_str(&value);
                    joined
                }
                None => value,
            });
        }
        filter
    }
}

/// Body of a list response: `{items: [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionList {
    /// Matching records in insertion order
    pub items: Vec<Resolution>,
}
