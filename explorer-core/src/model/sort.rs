//! src/model/sort.rs
//! ============================================================================
//! # Entry Sorting
//!
//! A listing is ordered by one of four fields in one of two directions. Field
//! names arrive as free text; names that are not recognised leave the scanner
//! order untouched instead of failing the request.

use std::cmp::Ordering;

use crate::error::AppError;
use crate::fs::entry_inspector::DirectoryEntry;

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Size,
    Type,
    Date,
}

impl SortField {
    /// `None` for unrecognised names.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(Self::Name),
            "size" => Some(Self::Size),
            "type" => Some(Self::Type),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &'_ str = match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Type => "type",
            Self::Date => "date",
        };

        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,

    Descending,
}

impl SortDirection {
    /// `asc` is ascending; every other value is descending.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "asc" => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Requested ordering for one listing. `field == None` means pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Builds a spec from raw query values.
    ///
    /// Both values must be non-empty. An unknown field is accepted and
    /// yields a pass-through spec.
    pub fn from_params(field: &str, order: &str) -> Result<Self, AppError> {
        if field.trim().is_empty() {
            return Err(AppError::invalid_input("sortField", "sort field is empty"));
        }

        if order.trim().is_empty() {
            return Err(AppError::invalid_input("sortOrder", "sort order is empty"));
        }

        Ok(Self {
            field: SortField::parse(field),
            direction: SortDirection::parse(order),
        })
    }
}

/// Returns `entries` ordered according to `spec`.
#[must_use]
pub fn sort_entries(mut entries: Vec<DirectoryEntry>, spec: SortSpec) -> Vec<DirectoryEntry> {
    let Some(field) = spec.field else {
        return entries;
    };

    entries.sort_by(|a: &DirectoryEntry, b: &DirectoryEntry| -> Ordering {
        compare(field, spec.direction, a, b)
    });

    entries
}

fn compare(
    field: SortField,
    direction: SortDirection,
    a: &DirectoryEntry,
    b: &DirectoryEntry,
) -> Ordering {
    let ascending: Ordering = match field {
        SortField::Name => a.relative_name.as_bytes().cmp(b.relative_name.as_bytes()),
        SortField::Size => a.byte_size.cmp(&b.byte_size),
        SortField::Date => a.modified.cmp(&b.modified),

        // Two-valued key with its own rule per direction
        SortField::Type => {
            return match direction {
                SortDirection::Ascending => directories_first(a, b),
                SortDirection::Descending => files_first(a, b),
            };
        }
    };

    match direction {
        SortDirection::Ascending => ascending,
        SortDirection::Descending => ascending.reverse(),
    }
}

const fn directories_first(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

const fn files_first(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    match (a.is_dir, b.is_dir) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
