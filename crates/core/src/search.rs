//! Search-field dispatch, pagination clamps, and sort parsing.
//!
//! A `(field, value)` query is resolved into exactly one predicate.
//! Unknown field names deliberately fall through to the generic
//! substring branch instead of erroring; the permissiveness is
//! intentional (and possibly worth revisiting with stakeholders), so it
//! is modeled as a named variant rather than validated away.

use crate::error::CoreError;
use crate::magnet::MagnetDescriptor;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of results per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1).min(MAX_PAGE_SIZE)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Field dispatch
// ---------------------------------------------------------------------------

/// Queryable video columns for the generic substring branch.
const SUBSTRING_COLUMNS: &[&str] = &["name", "description"];

/// The closed set of query-field strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchField {
    /// Decode the value as a magnet URI, match its info-hash exactly.
    MagnetUri,
    /// Match videos with at least one tag name containing the value.
    Tags,
    /// Match videos whose author's pod host contains the value.
    Host,
    /// Match videos whose author name contains the value.
    Author,
    /// Generic substring match on a video column. This is the default
    /// branch: any unrecognized field name lands here.
    Substring(String),
}

impl SearchField {
    /// Map a field name onto its strategy.
    pub fn parse(field: &str) -> Self {
        match field {
            "magnetUri" => Self::MagnetUri,
            "tags" => Self::Tags,
            "host" => Self::Host,
            "author" => Self::Author,
            other => Self::Substring(other.to_string()),
        }
    }

    /// Resolve this field with its value into a concrete predicate.
    ///
    /// Only the magnet branch can fail (malformed URI).
    pub fn predicate(&self, value: &str) -> Result<SearchPredicate, CoreError> {
        Ok(match self {
            Self::MagnetUri => {
                let descriptor = MagnetDescriptor::decode(value)?;
                // Other magnet fields (name, trackers) are ignored for
                // matching; identity is the info-hash alone.
                SearchPredicate::InfoHashEquals(descriptor.info_hash)
            }
            Self::Tags => SearchPredicate::TagContains(value.to_string()),
            Self::Host => SearchPredicate::HostContains(value.to_string()),
            Self::Author => SearchPredicate::AuthorContains(value.to_string()),
            Self::Substring(column) => SearchPredicate::ColumnContains {
                column: whitelist_column(column),
                value: value.to_string(),
            },
        })
    }
}

/// A resolved, storage-ready predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPredicate {
    InfoHashEquals(String),
    TagContains(String),
    HostContains(String),
    AuthorContains(String),
    ColumnContains {
        column: &'static str,
        value: String,
    },
}

/// Restrict substring columns to the known set; anything else searches
/// `name`. Keeps arbitrary field names away from SQL.
fn whitelist_column(column: &str) -> &'static str {
    SUBSTRING_COLUMNS
        .iter()
        .find(|c| **c == column)
        .copied()
        .unwrap_or("name")
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sortable columns. `Tag` exists because the tag join is always
/// present in search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    CreatedAt,
    Duration,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A parsed `sort` parameter, e.g. `-createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Default sort: newest first.
pub const DEFAULT_SORT: Sort = Sort {
    column: SortColumn::CreatedAt,
    direction: SortDirection::Desc,
};

impl Sort {
    /// Parse a sort parameter. A leading `-` means descending. Unknown
    /// columns fall back to the default sort.
    pub fn parse(sort: Option<&str>) -> Self {
        let raw = match sort {
            Some(s) if !s.is_empty() => s,
            _ => return DEFAULT_SORT,
        };

        let (direction, name) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, raw),
        };

        let column = match name {
            "name" => SortColumn::Name,
            "createdAt" => SortColumn::CreatedAt,
            "duration" => SortColumn::Duration,
            "tag" => SortColumn::Tag,
            _ => return DEFAULT_SORT,
        };

        Sort { column, direction }
    }

    /// SQL ORDER BY expression for the search query's grouped rows.
    pub fn sql(&self) -> String {
        let column = match self.column {
            SortColumn::Name => "videos.name",
            SortColumn::CreatedAt => "videos.created_at",
            SortColumn::Duration => "videos.duration",
            // The row group aggregates the tag join, so tag ordering
            // uses the first tag name.
            SortColumn::Tag => "MIN(tags.name)",
        };
        let direction = match self.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        format!("{column} {direction}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
