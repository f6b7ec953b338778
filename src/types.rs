//! Core data model for the catalog.
//!
//! A [`FileRecord`] describes one uploaded HTML file. Records are created by
//! the upload route from an [`UploadMetadata`] and never mutated afterwards;
//! the store only prepends and removes them.
//!
//! ```text
//! multipart form ──► UploadMetadata ──► FileRecord::new() ──► CatalogStore
//!   htmlFile            title              id (uuid v4)
//!   title               description        uploadDate (UTC now)
//!   description         category           fileSize
//!   category            tags               path (/uploads/<name>)
//!   tags ("a, b")       author
//!   author              version
//!   version
//! ```
//!
//! The JSON field names are camelCase so existing `files.json` indexes and
//! the frontend keep working unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Category assigned when the upload form leaves it empty
pub const DEFAULT_CATEGORY: &str = "other";

/// URL prefix under which stored files are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Metadata entry describing one uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Older indexes may hold `null` here
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    #[serde(rename = "path")]
    pub file_path: String,
    #[serde(default)]
    pub has_history: bool,
}

/// User-supplied text fields of an upload, after defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub version: String,
}

impl UploadMetadata {
    /// Apply the upload defaults: title falls back to the filename stem and
    /// category to [`DEFAULT_CATEGORY`].
    pub fn with_defaults(mut self, filename: &str) -> Self {
        if self.title.is_empty() {
            self.title = filename_stem(filename);
        }
        if self.category.is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        self
    }
}

impl FileRecord {
    /// Build a fresh record with a generated id and the current time
    pub fn new(filename: &str, metadata: UploadMetadata, file_size: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            title: metadata.title,
            description: metadata.description,
            category: metadata.category,
            tags: metadata.tags,
            author: metadata.author,
            version: metadata.version,
            file_size,
            upload_date: Utc::now(),
            file_path: format!("{UPLOADS_URL_PREFIX}{filename}"),
            has_history: false,
        }
    }
}

/// Fixed catalog category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

/// Split a comma-separated tag list, trimming entries and dropping empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce a client-supplied filename to a single safe path component.
///
/// Both `/` and `\` count as separators, so browser-style paths such as
/// `C:\fakepath\card.html` keep only `card.html`. Returns `None` for names
/// that would not address a regular file inside the upload directory.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => None,
        _ if name.contains('\0') => None,
        _ => Some(name.to_string()),
    }
}

fn filename_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
        .to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags("a, b ,, c"), vec!["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("card.html").as_deref(), Some("card.html"));
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_filename("C:\\fakepath\\card.html").as_deref(),
            Some("card.html")
        );
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("dir/"), None);
        assert_eq!(sanitize_filename("   "), None);
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = UploadMetadata::default().with_defaults("report.final.html");
        assert_eq!(meta.title, "report.final");
        assert_eq!(meta.category, DEFAULT_CATEGORY);

        let meta = UploadMetadata {
            title: "Sales".into(),
            category: "dashboard".into(),
            ..Default::default()
        }
        .with_defaults("sales.html");
        assert_eq!(meta.title, "Sales");
        assert_eq!(meta.category, "dashboard");
    }

    #[test]
    fn test_new_record() {
        let record = FileRecord::new("a.html", UploadMetadata::default().with_defaults("a.html"), 42);
        assert!(!record.id.is_empty());
        assert_eq!(record.file_path, "/uploads/a.html");
        assert_eq!(record.file_size, 42);
        assert!(!record.has_history);
    }

    #[test]
    fn test_record_json_shape() {
        let record = FileRecord::new("a.html", UploadMetadata::default(), 1);
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("fileSize").is_some());
        assert!(value.get("uploadDate").is_some());
        assert_eq!(value["path"], "/uploads/a.html");
        assert_eq!(value["hasHistory"], false);
        assert_eq!(value["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_record_accepts_null_tags_and_offsets() {
        let json = r#"{
            "id": "1",
            "filename": "a.html",
            "title": "a",
            "description": "",
            "category": "other",
            "tags": null,
            "author": "",
            "version": "",
            "fileSize": 10,
            "uploadDate": "2024-05-01T10:00:00.123+08:00",
            "path": "/uploads/a.html",
            "hasHistory": false
        }"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert!(record.tags.is_empty());
        assert_eq!(record.upload_date.to_rfc3339(), "2024-05-01T02:00:00.123+00:00");
    }
}
