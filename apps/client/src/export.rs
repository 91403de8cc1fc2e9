#![allow(dead_code)]

//! Export service — clipboard copy and file download of the current artifact.
//!
//! Both operations read the content store and fail with `EmptyContent` when
//! no generation of that kind has succeeded yet; the download path never
//! contacts the network in that case. Stored text is exported exactly as
//! stored — no transformation, no re-extraction.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::api_client::FileExporter;
use crate::errors::ClientError;
use crate::models::DocumentKind;
use crate::store::ContentStore;

/// Default filename offered for the CV artifact.
pub const DEFAULT_CV_FILENAME: &str = "cv_optimized.tex";
/// Default filename offered for the letter artifact.
pub const DEFAULT_LETTER_FILENAME: &str = "cover_letter.txt";

/// Clipboard seam. The system implementation talks to the host clipboard;
/// tests use the memory implementation.
pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError>;
}

/// Host clipboard via arboard.
pub struct SystemClipboard {
    clipboard: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClientError> {
        arboard::Clipboard::new()
            .map(|clipboard| Self { clipboard })
            .map_err(|e| ClientError::Platform(format!("cannot access system clipboard: {e}")))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.clipboard
            .set_text(text)
            .map_err(|e| ClientError::Platform(format!("clipboard write refused: {e}")))
    }
}

/// In-memory clipboard for tests and clipboard-less sessions. Clones share
/// the same content, so a caller can keep a handle to read back what was
/// copied after handing the clipboard over.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    content: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn content(&self) -> Option<String> {
        self.content.lock().expect("memory clipboard poisoned").clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError> {
        *self.content.lock().expect("memory clipboard poisoned") = Some(text.to_string());
        Ok(())
    }
}

/// Stand-in wired when the host has no clipboard at all (headless session);
/// surfaces the original probe failure at copy time.
struct UnavailableClipboard {
    reason: String,
}

impl Clipboard for UnavailableClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClientError> {
        Err(ClientError::Platform(self.reason.clone()))
    }
}

/// Builds the host clipboard, degrading to an always-refusing stub when the
/// platform has none.
pub fn system_clipboard() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            warn!("system clipboard unavailable: {e}");
            Box::new(UnavailableClipboard {
                reason: e.to_string(),
            })
        }
    }
}

pub struct ExportService {
    store: Arc<ContentStore>,
    exporter: Arc<dyn FileExporter>,
    clipboard: Mutex<Box<dyn Clipboard>>,
    download_dir: PathBuf,
}

impl ExportService {
    pub fn new(
        store: Arc<ContentStore>,
        exporter: Arc<dyn FileExporter>,
        clipboard: Box<dyn Clipboard>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            exporter,
            clipboard: Mutex::new(clipboard),
            download_dir,
        }
    }

    /// Places the exact stored text of `kind` on the clipboard.
    pub fn copy_to_clipboard(&self, kind: DocumentKind) -> Result<(), ClientError> {
        let document = self
            .store
            .get_current(kind)
            .ok_or(ClientError::EmptyContent(kind))?;
        let mut clipboard = self.clipboard.lock().expect("clipboard lock poisoned");
        clipboard.set_text(document.text())?;
        debug!(%kind, bytes = document.text().len(), "copied to clipboard");
        Ok(())
    }

    /// Renders the stored text of `kind` through the export endpoint and
    /// saves the returned bytes under `filename` in the download directory.
    ///
    /// The byte stream is staged in a named temp file in the destination
    /// directory and then persisted into place, so a failed save never
    /// leaves a partial file and the staging handle is released on every
    /// exit path.
    pub async fn download(
        &self,
        kind: DocumentKind,
        filename: &str,
    ) -> Result<PathBuf, ClientError> {
        let document = self
            .store
            .get_current(kind)
            .ok_or(ClientError::EmptyContent(kind))?;
        let bytes = self.exporter.fetch_export(document.text(), filename).await?;

        let target = self.download_dir.join(filename);
        stage_and_persist(&self.download_dir, &target, &bytes)
            .map_err(|e| ClientError::Platform(format!("cannot save {}: {e}", target.display())))?;
        info!(path = %target.display(), bytes = bytes.len(), "export saved");
        Ok(target)
    }
}

fn stage_and_persist(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedDocument, LatexDocument, LetterText};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubExporter {
        calls: AtomicUsize,
        response: Result<Bytes, ()>,
    }

    impl StubExporter {
        fn returning(bytes: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response: Ok(Bytes::copy_from_slice(bytes)),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response: Err(()),
            })
        }
    }

    #[async_trait]
    impl FileExporter for StubExporter {
        async fn fetch_export(
            &self,
            _content: &str,
            _filename: &str,
        ) -> Result<Bytes, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(bytes) => Ok(bytes.clone()),
                Err(()) => Err(ClientError::Service("render failed".to_string())),
            }
        }
    }

    fn store_with_cv(text: &str) -> Arc<ContentStore> {
        let store = Arc::new(ContentStore::new());
        store.set_current(ExtractedDocument::Latex(LatexDocument {
            text: text.to_string(),
        }));
        store
    }

    fn service(store: Arc<ContentStore>, exporter: Arc<StubExporter>, dir: &Path) -> ExportService {
        ExportService::new(
            store,
            exporter,
            Box::new(MemoryClipboard::default()),
            dir.to_path_buf(),
        )
    }

    #[test]
    fn test_copy_preserves_stored_text_exactly() {
        let text = "\\documentclass{article}\n% über-exact bytes\n\\end{document}";
        let store = store_with_cv(text);
        let clipboard = MemoryClipboard::default();
        let exports = ExportService::new(
            store,
            StubExporter::returning(b"unused"),
            Box::new(clipboard.clone()),
            PathBuf::from("."),
        );

        exports.copy_to_clipboard(DocumentKind::Cv).unwrap();
        assert_eq!(clipboard.content().as_deref(), Some(text));
    }

    #[test]
    fn test_copy_without_content_is_empty_content_error() {
        let store = Arc::new(ContentStore::new());
        let exports = service(store, StubExporter::returning(b"unused"), Path::new("."));
        let err = exports.copy_to_clipboard(DocumentKind::Letter).unwrap_err();
        assert!(matches!(err, ClientError::EmptyContent(DocumentKind::Letter)));
    }

    #[test]
    fn test_unavailable_clipboard_surfaces_platform_error() {
        let store = store_with_cv("text");
        let exports = ExportService::new(
            store,
            StubExporter::returning(b"unused"),
            Box::new(UnavailableClipboard {
                reason: "no display".to_string(),
            }),
            PathBuf::from("."),
        );
        let err = exports.copy_to_clipboard(DocumentKind::Cv).unwrap_err();
        assert!(matches!(err, ClientError::Platform(_)));
    }

    #[tokio::test]
    async fn test_download_without_content_never_contacts_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = StubExporter::returning(b"pdf bytes");
        let store = Arc::new(ContentStore::new());
        let exports = service(store, Arc::clone(&exporter), dir.path());

        let err = exports
            .download(DocumentKind::Letter, DEFAULT_LETTER_FILENAME)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::EmptyContent(DocumentKind::Letter)));
        assert_eq!(exporter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_writes_returned_bytes_under_filename() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = StubExporter::returning(b"rendered bytes");
        let store = store_with_cv("\\documentclass{article}\\end{document}");
        let exports = service(store, Arc::clone(&exporter), dir.path());

        let path = exports
            .download(DocumentKind::Cv, DEFAULT_CV_FILENAME)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join(DEFAULT_CV_FILENAME));
        assert_eq!(std::fs::read(&path).unwrap(), b"rendered bytes");
        assert_eq!(exporter.calls.load(Ordering::SeqCst), 1);
        // The staging temp file was persisted, not left beside the target.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_export_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = StubExporter::failing();
        let store = Arc::new(ContentStore::new());
        store.set_current(ExtractedDocument::Letter(LetterText {
            text: "Dear team,".to_string(),
        }));
        let exports = service(store, exporter, dir.path());

        exports
            .download(DocumentKind::Letter, "letter.txt")
            .await
            .unwrap_err();
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "no staged or partial files may remain");
    }
}
