//! Request and document types shared across the client.

use std::fmt;

use serde::Serialize;

/// The three submission kinds the service accepts. Each has its own form,
/// its own endpoint, and its own independent submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    JobSearch,
    Cv,
    CoverLetter,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::JobSearch => write!(f, "job search"),
            RequestKind::Cv => write!(f, "CV"),
            RequestKind::CoverLetter => write!(f, "cover letter"),
        }
    }
}

/// The two exportable document kinds held by the content store. Job-search
/// results are rendered but never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Cv,
    Letter,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Cv => write!(f, "CV"),
            DocumentKind::Letter => write!(f, "letter"),
        }
    }
}

/// A raw file attachment. The client ships the bytes as-is; text extraction
/// from PDF/DOCX is the service's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields of a job-search submission, sent as a JSON map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSearchForm {
    pub job_title: String,
    pub location: String,
    pub experience_level: String,
    pub skills: String,
}

/// Fields of a CV-generation submission, sent as multipart form data.
/// `cv_file` takes precedence over `cv_content` when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvForm {
    pub cv_content: Option<String>,
    pub cv_file: Option<Attachment>,
    pub job_description: String,
    pub personal_info: String,
}

/// Fields of a cover-letter submission, sent as multipart form data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterForm {
    pub cv_content: Option<String>,
    pub cv_file: Option<Attachment>,
    pub job_description: String,
    pub company_info: String,
}

/// One submission. Created when the user triggers a form, immutable, and
/// dropped once the matching response resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    JobSearch(JobSearchForm),
    Cv(CvForm),
    CoverLetter(LetterForm),
}

impl GenerationRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            GenerationRequest::JobSearch(_) => RequestKind::JobSearch,
            GenerationRequest::Cv(_) => RequestKind::Cv,
            GenerationRequest::CoverLetter(_) => RequestKind::CoverLetter,
        }
    }
}

/// LaTeX source recovered from a generation response. When the response
/// carried no document markers this holds the whole response text instead —
/// degraded, but still renderable and exportable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexDocument {
    pub text: String,
}

/// Letter body recovered from a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterText {
    pub text: String,
}

/// An artifact the content store can hold, discriminated by document kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedDocument {
    Latex(LatexDocument),
    Letter(LetterText),
}

impl ExtractedDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ExtractedDocument::Latex(_) => DocumentKind::Cv,
            ExtractedDocument::Letter(_) => DocumentKind::Letter,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ExtractedDocument::Latex(doc) => &doc.text,
            ExtractedDocument::Letter(letter) => &letter.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_matches_variant() {
        let request = GenerationRequest::Cv(CvForm::default());
        assert_eq!(request.kind(), RequestKind::Cv);

        let request = GenerationRequest::CoverLetter(LetterForm::default());
        assert_eq!(request.kind(), RequestKind::CoverLetter);
    }

    #[test]
    fn test_extracted_document_kind_and_text() {
        let doc = ExtractedDocument::Latex(LatexDocument {
            text: "\\documentclass{article}".to_string(),
        });
        assert_eq!(doc.kind(), DocumentKind::Cv);
        assert_eq!(doc.text(), "\\documentclass{article}");

        let letter = ExtractedDocument::Letter(LetterText {
            text: "Dear team,".to_string(),
        });
        assert_eq!(letter.kind(), DocumentKind::Letter);
        assert_eq!(letter.text(), "Dear team,");
    }

    #[test]
    fn test_job_search_form_serializes_as_flat_map() {
        let form = JobSearchForm {
            job_title: "Backend Engineer".to_string(),
            location: "Lyon".to_string(),
            experience_level: "senior".to_string(),
            skills: "Rust, SQL".to_string(),
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["job_title"], "Backend Engineer");
        assert_eq!(json["location"], "Lyon");
        assert_eq!(json["experience_level"], "senior");
        assert_eq!(json["skills"], "Rust, SQL");
    }
}
