//! src/model/formatted.rs
//!
//! Display projection of a sorted listing, shaped for the JSON response.

use serde::{Deserialize, Serialize};

use crate::config::Locale;
use crate::fs::entry_inspector::DirectoryEntry;
use crate::util::humanize::{format_modified, format_size};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedEntry {
    #[serde(rename = "relPath")]
    pub rel_path: String,

    /// Human-scaled size, e.g. `1.50 KB`
    #[serde(rename = "itemSize")]
    pub item_size: String,

    /// Localised file/directory label
    #[serde(rename = "type")]
    pub kind: String,

    /// `DD.MM.YYYY HH:MM`
    #[serde(rename = "editDate")]
    pub edit_date: String,
}

/// Localised labels used in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub file: &'static str,
    pub directory: &'static str,
    pub no_data: &'static str,
    pub server_error: &'static str,
}

impl Labels {
    #[must_use]
    pub const fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                file: "File",
                directory: "Directory",
                no_data: "No data",
                server_error: "Internal server error",
            },
            Locale::Ru => Self {
                file: "Файл",
                directory: "Папка",
                no_data: "Нет данных",
                server_error: "Внутренняя ошибка сервера",
            },
        }
    }
}

impl FormattedEntry {
    #[must_use]
    pub fn from_entry(entry: &DirectoryEntry, locale: Locale) -> Self {
        let labels: Labels = Labels::for_locale(locale);
        let kind: &'static str = if entry.is_dir {
            labels.directory
        } else {
            labels.file
        };

        Self {
            rel_path: entry.relative_name.to_string(),
            item_size: format_size(entry.byte_size, locale),
            kind: kind.to_string(),
            edit_date: format_modified(entry.modified),
        }
    }
}

/// Projects entries in their current order.
#[must_use]
pub fn format_entries(entries: &[DirectoryEntry], locale: Locale) -> Vec<FormattedEntry> {
    entries
        .iter()
        .map(|entry| FormattedEntry::from_entry(entry, locale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use std::time::SystemTime;

    #[test]
    fn test_projection_and_json_keys() {
        let entries = vec![
            DirectoryEntry {
                relative_name: CompactString::new("music"),
                byte_size: 1_572_864,
                modified: SystemTime::now(),
                is_dir: true,
            },
            DirectoryEntry {
                relative_name: CompactString::new("a.txt"),
                byte_size: 12,
                modified: SystemTime::now(),
                is_dir: false,
            },
        ];

        let formatted = format_entries(&entries, Locale::En);
        assert_eq!(formatted[0].rel_path, "music");
        assert_eq!(formatted[0].item_size, "1.50 MB");
        assert_eq!(formatted[0].kind, "Directory");
        assert_eq!(formatted[1].kind, "File");
        assert_eq!(formatted[1].item_size, "12 bytes");

        let json = serde_json::to_value(&formatted[1]).unwrap();
        for key in ["relPath", "itemSize", "type", "editDate"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_russian_labels() {
        let entry = DirectoryEntry {
            relative_name: CompactString::new("docs"),
            byte_size: 0,
            modified: SystemTime::now(),
            is_dir: true,
        };

        let formatted = FormattedEntry::from_entry(&entry, Locale::Ru);
        assert_eq!(formatted.kind, "Папка");
        assert_eq!(formatted.item_size, "0 байт");
    }
}
