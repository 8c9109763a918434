//! # Image Reference Resolver
//!
//! Turns a stored drive reference into a thumbnail URL.
//!
//! Recognized shapes, in priority order:
//! 1. path form: `.../d/<id>/...` (or `.../d/<id>` at the end)
//! 2. query form: `...uc?id=<id>[&...]`
//! 3. anything else passes through unchanged

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::observability::Event;
use crate::store::Picture;

/// Thumbnail endpoint the resolved URLs point at
pub const THUMBNAIL_BASE: &str = "https://drive.google.com/thumbnail?id=";

const PATH_MARKER: &str = "/d/";
const QUERY_MARKER: &str = "uc?id=";

/// Which shape a reference was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceForm {
    Path,
    Query,
    Unrecognized,
}

/// Extract the file id and the form it was found in
pub fn parse_reference(reference: &str) -> (ReferenceForm, Option<&str>) {
    if let Some((_, rest)) = reference.split_once(PATH_MARKER) {
        let file_id = rest.split('/').next().unwrap_or_default();
        return (ReferenceForm::Path, Some(file_id));
    }
    if let Some((_, rest)) = reference.split_once(QUERY_MARKER) {
        let file_id = rest.split('&').next().unwrap_or_default();
        return (ReferenceForm::Query, Some(file_id));
    }
    (ReferenceForm::Unrecognized, None)
}

/// Resolve a stored reference to a display URL.
///
/// `None` in, `None` out. Never fails: unknown shapes are returned as-is.
pub fn resolve_display_url(reference: Option<&str>) -> Option<String> {
    let reference = reference?;

    match parse_reference(reference) {
        (ReferenceForm::Path | ReferenceForm::Query, Some(file_id)) => {
            Some(format!("{}{}", THUMBNAIL_BASE, file_id))
        }
        _ => {
            warn!(
                event = %Event::ReferenceUnrecognized,
                reference = %reference,
                "unrecognized picture reference, passing through"
            );
            Some(reference.to_string())
        }
    }
}

/// Picture listing entry with its resolved URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPicture {
    pub id: u64,
    pub data: String,
    pub url: Option<String>,
}

impl From<Picture> for ResolvedPicture {
    fn from(picture: Picture) -> Self {
        let url = resolve_display_url(Some(&picture.data));
        Self {
            id: picture.id,
            data: picture.data,
            url,
        }
    }
}

/// Body of `GET /pictures/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureUrl {
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_form() {
        let url = resolve_display_url(Some("https://drive.google.com/file/d/XYZ123/view"));
        assert_eq!(
            url.as_deref(),
            Some("https://drive.google.com/thumbnail?id=XYZ123")
        );
    }

    #[test]
    fn test_path_form_at_end() {
        let url = resolve_display_url(Some("https://drive.google.com/file/d/XYZ123"));
        assert_eq!(
            url.as_deref(),
            Some("https://drive.google.com/thumbnail?id=XYZ123")
        );
    }

    #[test]
    fn test_query_form_strips_extra_params() {
        let url = resolve_display_url(Some("https://drive.google.com/uc?id=XYZ123&extra=1"));
        assert_eq!(
            url.as_deref(),
            Some("https://drive.google.com/thumbnail?id=XYZ123")
        );
    }

    #[test]
    fn test_path_form_wins_over_query_form() {
        let (form, id) = parse_reference("https://host/d/AAA/uc?id=BBB");
        assert_eq!(form, ReferenceForm::Path);
        assert_eq!(id, Some("AAA"));
    }

    #[test]
    fn test_unrecognized_passes_through() {
        let reference = "https://cdn.example.com/logo.png";
        assert_eq!(
            resolve_display_url(Some(reference)).as_deref(),
            Some(reference)
        );
    }

    #[test]
    fn test_null_stays_null() {
        assert_eq!(resolve_display_url(None), None);
    }

    #[test]
    fn test_empty_id_does_not_fail() {
        let url = resolve_display_url(Some("https://drive.google.com/d//view"));
        assert_eq!(url.as_deref(), Some(THUMBNAIL_BASE));
    }

    #[test]
    fn test_resolved_picture_from_record() {
        let picture = Picture {
            id: 4,
            data: "https://drive.google.com/uc?id=abc123".to_string(),
        };
        let resolved = ResolvedPicture::from(picture);
        assert_eq!(resolved.id, 4);
        assert!(resolved.url.unwrap().ends_with("abc123"));
    }
}
