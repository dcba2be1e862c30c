//! Client-side filtering and ordering of catalog records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::BigThing;

/// Ordering applied to the visible catalog list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending by name, ignoring case.
    #[default]
    Name,
    /// Descending by numeric rating; malformed ratings count as zero.
    Rating,
}

impl SortOrder {
    /// The other ordering.
    ///
    /// # Examples
    /// ```
    /// use bigthings_core::SortOrder;
    ///
    /// assert_eq!(SortOrder::Name.toggle(), SortOrder::Rating);
    /// assert_eq!(SortOrder::Rating.toggle(), SortOrder::Name);
    /// ```
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Name => Self::Rating,
            Self::Rating => Self::Name,
        }
    }

    /// Compare two records under this ordering.
    #[must_use]
    pub fn compare(self, lhs: &BigThing, rhs: &BigThing) -> Ordering {
        match self {
            Self::Name => lhs.name.to_lowercase().cmp(&rhs.name.to_lowercase()),
            Self::Rating => rhs.rating_value().total_cmp(&lhs.rating_value()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Rating => f.write_str("rating"),
        }
    }
}

/// Error returned when parsing an unknown [`SortOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order {0:?}; expected \"name\" or \"rating\"")]
pub struct ParseSortOrderError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            _ => Err(ParseSortOrderError(s.to_owned())),
        }
    }
}

/// Keep records whose name or location contains `query`, ignoring case.
///
/// A blank query keeps every record. Relative order is preserved.
///
/// # Examples
/// ```
/// use bigthings_core::{BigThing, filter_records};
///
/// let records: Vec<BigThing> = serde_json::from_str(r#"[
///     {"id": "1", "name": "Big Banana", "location": "Coffs Harbour"},
///     {"id": "2", "name": "Big Prawn", "location": "Ballina"}
/// ]"#)?;
/// let found = filter_records(&records, "BALL");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id, "2");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
pub fn filter_records<'a>(records: &'a [BigThing], query: &str) -> Vec<&'a BigThing> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}

/// Sort records in place. The sort is stable, so ties keep their order.
pub fn sort_records(records: &mut [&BigThing], order: SortOrder) {
    records.sort_by(|lhs, rhs| order.compare(lhs, rhs));
}

/// Filter then sort, producing the list a front end displays.
#[must_use]
pub fn visible_records<'a>(
    records: &'a [BigThing],
    query: &str,
    order: SortOrder,
) -> Vec<&'a BigThing> {
    let mut visible = filter_records(records, query);
    sort_records(&mut visible, order);
    visible
}
