//! Interactive shell — the terminal driver for submissions and exports.
//!
//! Wiring only: commands are parsed here and handed to the coordinator and
//! the export service. Rendering goes through the `UiPort`/`NoticeSink`
//! implementations below, so the core components never touch the terminal.
//! Submissions are fire-and-forget: the prompt stays responsive while
//! requests are in flight, and overlapping submissions are allowed.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::coordinator::UiPort;
use crate::export::{DEFAULT_CV_FILENAME, DEFAULT_LETTER_FILENAME};
use crate::models::{
    Attachment, CvForm, DocumentKind, GenerationRequest, JobSearchForm, LetterForm, RequestKind,
};
use crate::notify::{Notice, NoticeSink, NotificationCenter, Severity};
use crate::state::AppState;

type InputLines = Lines<BufReader<Stdin>>;

/// Attachment formats the service can read. Anything else is still sent —
/// the service has the final word — but the user gets a heads-up.
const KNOWN_ATTACHMENT_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Prints notice lifecycle events as they happen.
pub struct TerminalSink;

impl NoticeSink for TerminalSink {
    fn posted(&self, notice: &Notice) {
        let mark = match notice.severity {
            Severity::Success => "✓",
            Severity::Error => "✗",
        };
        println!(
            "[{}] {mark} {}  (notice #{}, auto-dismisses in 5s)",
            notice.posted_at.format("%H:%M:%S"),
            notice.message,
            notice.id
        );
    }

    fn removed(&self, notice: &Notice) {
        debug!(id = notice.id, "notice removed");
    }
}

/// Renders coordinator events on the terminal; notifications are routed to
/// the notification center, which owns their lifecycle.
pub struct TerminalUi {
    notices: Arc<NotificationCenter>,
}

impl TerminalUi {
    pub fn new(notices: Arc<NotificationCenter>) -> Self {
        Self { notices }
    }
}

impl UiPort for TerminalUi {
    fn notify(&self, severity: Severity, message: String) {
        self.notices.post(severity, message);
    }

    fn show_loading(&self) {
        println!("⟳ generating…");
    }

    fn hide_loading(&self) {
        println!("⟳ all requests settled");
    }

    fn show_result(&self, kind: RequestKind, body: String) {
        println!("\n──── {kind} result ────");
        println!("{body}");
        println!("───────────────────────");
    }
}

pub async fn run(state: AppState) -> Result<()> {
    println!("Job application assistant — type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg1 = words.next();
        let arg2 = words.next();

        match command {
            "help" => print_help(),
            "search" => match read_search_form(&mut lines).await {
                Ok(form) => {
                    state.coordinator.submit(GenerationRequest::JobSearch(form));
                }
                Err(e) => println!("! {e:#}"),
            },
            "cv" => match read_cv_form(&mut lines).await {
                Ok(form) => {
                    state.coordinator.submit(GenerationRequest::Cv(form));
                }
                Err(e) => println!("! {e:#}"),
            },
            "letter" => match read_letter_form(&mut lines).await {
                Ok(form) => {
                    state.coordinator.submit(GenerationRequest::CoverLetter(form));
                }
                Err(e) => println!("! {e:#}"),
            },
            "copy" => copy(&state, arg1),
            "download" => download(&state, arg1, arg2).await,
            "status" => print_status(&state),
            "notices" => list_notices(&state),
            "dismiss" => dismiss(&state, arg1),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}' — type 'help'"),
        }
    }
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  search              submit a job search");
    println!("  cv                  generate an ATS-optimized CV (LaTeX)");
    println!("  letter              generate a cover letter");
    println!("  copy cv|letter      copy the current document to the clipboard");
    println!("  download [cv|letter] [filename]");
    println!("                      save the current document via the export service");
    println!("  status              submission states and stored documents");
    println!("  notices             list visible notices");
    println!("  dismiss <id>        dismiss a notice before it expires");
    println!("  quit");
    println!("field values starting with @ are read from that file path");
}

async fn read_search_form(lines: &mut InputLines) -> Result<JobSearchForm> {
    Ok(JobSearchForm {
        job_title: prompt_field(lines, "job title").await?,
        location: prompt_field(lines, "location").await?,
        experience_level: prompt_field(lines, "experience level").await?,
        skills: prompt_field(lines, "skills").await?,
    })
}

async fn read_cv_form(lines: &mut InputLines) -> Result<CvForm> {
    let cv_file = read_attachment(lines).await?;
    let cv_content = match cv_file {
        Some(_) => None,
        None => Some(prompt_field(lines, "resume text").await?),
    };
    Ok(CvForm {
        cv_content,
        cv_file,
        job_description: prompt_field(lines, "job description").await?,
        personal_info: prompt_field(lines, "personal info").await?,
    })
}

async fn read_letter_form(lines: &mut InputLines) -> Result<LetterForm> {
    let cv_file = read_attachment(lines).await?;
    let cv_content = match cv_file {
        Some(_) => None,
        None => Some(prompt_field(lines, "resume text").await?),
    };
    Ok(LetterForm {
        cv_content,
        cv_file,
        job_description: prompt_field(lines, "job description").await?,
        company_info: prompt_field(lines, "company info").await?,
    })
}

async fn read_attachment(lines: &mut InputLines) -> Result<Option<Attachment>> {
    let path = prompt_raw(lines, "resume file path (blank to paste text)").await?;
    if path.is_empty() {
        return Ok(None);
    }
    let extension = Path::new(&path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !KNOWN_ATTACHMENT_EXTENSIONS.contains(&extension.as_str()) {
        println!("  note: service expects PDF, DOCX or TXT; sending anyway");
    }
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("cannot read {path}"))?;
    let filename = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(Some(Attachment { filename, bytes }))
}

/// Prompts for one field; a value starting with `@` is read from that file.
async fn prompt_field(lines: &mut InputLines, label: &str) -> Result<String> {
    let value = prompt_raw(lines, label).await?;
    match value.strip_prefix('@') {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {path}")),
        None => Ok(value),
    }
}

async fn prompt_raw(lines: &mut InputLines, label: &str) -> Result<String> {
    print!("  {label}: ");
    std::io::stdout().flush().ok();
    Ok(lines
        .next_line()
        .await?
        .unwrap_or_default()
        .trim()
        .to_string())
}

fn parse_document_kind(word: &str) -> Option<DocumentKind> {
    match word {
        "cv" => Some(DocumentKind::Cv),
        "letter" => Some(DocumentKind::Letter),
        _ => None,
    }
}

fn copy(state: &AppState, arg: Option<&str>) {
    let Some(kind) = arg.and_then(parse_document_kind) else {
        println!("usage: copy cv|letter");
        return;
    };
    match state.exports.copy_to_clipboard(kind) {
        Ok(()) => {
            state
                .notices
                .post(Severity::Success, "Content copied to clipboard.");
        }
        Err(e) => {
            state.notices.post(Severity::Error, format!("Copy failed: {e}"));
        }
    }
}

async fn download(state: &AppState, arg1: Option<&str>, arg2: Option<&str>) {
    // `download`, `download <filename>`, `download cv|letter [filename]`.
    let (kind, filename) = match arg1 {
        Some(word) => match parse_document_kind(word) {
            Some(kind) => (kind, arg2),
            None => (DocumentKind::Cv, Some(word)),
        },
        None => (DocumentKind::Cv, None),
    };
    let filename = filename.unwrap_or(match kind {
        DocumentKind::Cv => DEFAULT_CV_FILENAME,
        DocumentKind::Letter => DEFAULT_LETTER_FILENAME,
    });

    match state.exports.download(kind, filename).await {
        Ok(path) => {
            state.notices.post(
                Severity::Success,
                format!("File saved to {}.", path.display()),
            );
        }
        Err(e) => {
            state
                .notices
                .post(Severity::Error, format!("Download failed: {e}"));
        }
    }
}

fn print_status(state: &AppState) {
    println!("  service: {}", state.config.api_base_url);
    for kind in [RequestKind::JobSearch, RequestKind::Cv, RequestKind::CoverLetter] {
        println!("  {kind}: {:?}", state.coordinator.state(kind));
    }
    for kind in [DocumentKind::Cv, DocumentKind::Letter] {
        match state.store.get_current(kind) {
            Some(document) => println!("  current {kind}: {} bytes", document.text().len()),
            None => println!("  current {kind}: none"),
        }
    }
}

fn list_notices(state: &AppState) {
    let active = state.notices.active();
    if active.is_empty() {
        println!("  no visible notices");
        return;
    }
    for notice in active {
        println!("  #{} [{}] {}", notice.id, notice.severity, notice.message);
    }
}

fn dismiss(state: &AppState, arg: Option<&str>) {
    let Some(id) = arg.and_then(|a| a.parse().ok()) else {
        println!("usage: dismiss <id>");
        return;
    };
    if !state.notices.dismiss(id) {
        println!("  no such notice (already gone?)");
    }
}
