use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A source file registered against a project. Parsing and upload happen
/// upstream; this record only tracks where the text lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub file_name: String,
    pub path: Option<String>,
    pub parser_file_path: Option<String>,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: String, project_id: String, file_name: String) -> Self {
        let now = super::now();
        Self {
            id,
            project_id,
            file_name,
            path: None,
            parser_file_path: None,
            size: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Prefer the pre-parsed text over the raw upload.
    pub fn source_path(&self) -> Option<&str> {
        self.parser_file_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.path.as_deref().filter(|p| !p.trim().is_empty()))
    }

    /// File name without its final extension, used to name chunks.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub path: Option<String>,
    pub parser_file_path: Option<String>,
    #[serde(default)]
    pub size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new("d1".into(), "p1".into(), "guide.pdf".into())
    }

    #[test]
    fn test_source_path_prefers_parsed_file() {
        let mut d = doc();
        d.path = Some("/uploads/guide.pdf".into());
        d.parser_file_path = Some("/parsed/guide.md".into());
        assert_eq!(d.source_path(), Some("/parsed/guide.md"));
    }

    #[test]
    fn test_source_path_falls_back_to_raw_path() {
        let mut d = doc();
        d.path = Some("/uploads/guide.pdf".into());
        d.parser_file_path = Some("  ".into());
        assert_eq!(d.source_path(), Some("/uploads/guide.pdf"));
    }

    #[test]
    fn test_source_path_none_when_nothing_resolvable() {
        let mut d = doc();
        d.path = Some(String::new());
        assert_eq!(d.source_path(), None);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(doc().file_stem(), "guide");

        let dotted = Document::new("d".into(), "p".into(), "v1.2.notes.md".into());
        assert_eq!(dotted.file_stem(), "v1.2.notes");

        let bare = Document::new("d".into(), "p".into(), "README".into());
        assert_eq!(bare.file_stem(), "README");

        let hidden = Document::new("d".into(), "p".into(), ".env".into());
        assert_eq!(hidden.file_stem(), ".env");
    }

    #[test]
    fn test_create_document_request_validation() {
        let req = CreateDocumentRequest {
            file_name: String::new(),
            path: None,
            parser_file_path: None,
            size: 0,
        };
        assert!(req.validate().is_err());
    }
}
