//! Content store — the single current artifact per document kind.

use std::sync::Mutex;

use crate::models::{DocumentKind, ExtractedDocument};

/// Holds the most recently generated document of each kind for the lifetime
/// of the process.
///
/// One mutex guards both slots: a replace is atomic and readers clone the
/// stored value out, so a concurrent reader can never observe a partial
/// write. Replacement is unconditional — no merging, no versioning, no
/// history; whichever generation resolves last is current.
#[derive(Debug, Default)]
pub struct ContentStore {
    slots: Mutex<Slots>,
}

#[derive(Debug, Default)]
struct Slots {
    cv: Option<ExtractedDocument>,
    letter: Option<ExtractedDocument>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current artifact of the document's kind.
    pub fn set_current(&self, document: ExtractedDocument) {
        let mut slots = self.slots.lock().expect("content store lock poisoned");
        match document.kind() {
            DocumentKind::Cv => slots.cv = Some(document),
            DocumentKind::Letter => slots.letter = Some(document),
        }
    }

    /// The current artifact of `kind`, if any generation of it has succeeded.
    pub fn get_current(&self, kind: DocumentKind) -> Option<ExtractedDocument> {
        let slots = self.slots.lock().expect("content store lock poisoned");
        match kind {
            DocumentKind::Cv => slots.cv.clone(),
            DocumentKind::Letter => slots.letter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LatexDocument, LetterText};

    fn latex(text: &str) -> ExtractedDocument {
        ExtractedDocument::Latex(LatexDocument {
            text: text.to_string(),
        })
    }

    fn letter(text: &str) -> ExtractedDocument {
        ExtractedDocument::Letter(LetterText {
            text: text.to_string(),
        })
    }

    #[test]
    fn test_get_returns_exact_value_set() {
        let store = ContentStore::new();
        store.set_current(latex("\\documentclass{article}\n\\end{document}"));
        assert_eq!(
            store.get_current(DocumentKind::Cv),
            Some(latex("\\documentclass{article}\n\\end{document}"))
        );
    }

    #[test]
    fn test_empty_store_has_no_current() {
        let store = ContentStore::new();
        assert_eq!(store.get_current(DocumentKind::Cv), None);
        assert_eq!(store.get_current(DocumentKind::Letter), None);
    }

    #[test]
    fn test_replace_is_full_and_last_write_wins() {
        let store = ContentStore::new();
        store.set_current(latex("first"));
        store.set_current(latex("second"));
        assert_eq!(store.get_current(DocumentKind::Cv), Some(latex("second")));
    }

    #[test]
    fn test_kinds_are_independent() {
        let store = ContentStore::new();
        store.set_current(latex("cv text"));
        store.set_current(letter("letter text"));
        assert_eq!(store.get_current(DocumentKind::Cv), Some(latex("cv text")));
        assert_eq!(
            store.get_current(DocumentKind::Letter),
            Some(letter("letter text"))
        );
    }
}
