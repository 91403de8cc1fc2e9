//! Response extraction — recovers a document from an unstructured AI payload.
//!
//! Pure text functions, no I/O. Extraction never fails: when the expected
//! markers are missing, the whole textual form is returned instead, so a
//! response that ignores the document grammar is still rendered and
//! exportable.

use std::borrow::Cow;

use serde_json::Value;

use crate::models::{LatexDocument, LetterText};

/// Opening marker of a LaTeX document.
pub const DOC_START: &str = r"\documentclass";
/// Closing marker of a LaTeX document.
pub const DOC_END: &str = r"\end{document}";

/// Canonical textual form of a response payload: strings pass through
/// untouched, anything structured gets the stable pretty serialization
/// (ordered keys, two-space indent). Deeply-equal values always canonicalize
/// to byte-identical text.
pub fn payload_text(payload: &Value) -> Cow<'_, str> {
    match payload {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(
            serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        ),
    }
}

/// The `\documentclass ... \end{document}` span of `text`, if present.
///
/// The span runs from the first start marker to the last end marker,
/// inclusive; an end marker that finishes before the start marker does not
/// count. Matching is byte-offset based, not line-anchored.
pub fn latex_span(text: &str) -> Option<&str> {
    let start = text.find(DOC_START)?;
    let end = text.rfind(DOC_END)? + DOC_END.len();
    (end > start).then(|| &text[start..end])
}

/// Recovers the LaTeX source from a generation payload.
///
/// Falls back to the whole textual form when no complete document span is
/// found — upstream generation is not contractually guaranteed to wrap its
/// output in the markers, and a degraded document beats a lost one.
pub fn extract_latex(payload: &Value) -> LatexDocument {
    let text = payload_text(payload);
    match latex_span(&text) {
        Some(span) => LatexDocument {
            text: span.to_string(),
        },
        None => LatexDocument {
            text: text.into_owned(),
        },
    }
}

/// Recovers the letter body from a generation payload. Textual payloads pass
/// through verbatim; structured payloads are canonicalized.
pub fn extract_letter(payload: &Value) -> LetterText {
    LetterText {
        text: payload_text(payload).into_owned(),
    }
}
