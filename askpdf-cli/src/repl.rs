//! The interactive console.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use askpdf_rag::{DocumentEntry, PdfAssistant, Session, UploadOutcome, UploadedFile};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

use crate::commands::{Command, HELP};
use crate::reveal::reveal;

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One user's session bound to an assistant.
pub struct Console {
    assistant: PdfAssistant,
    session: Session,
    typing_delay: Duration,
}

impl Console {
    pub fn new(assistant: PdfAssistant, typing_delay: Duration) -> Self {
        Self { assistant, session: Session::new(), typing_delay }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read lines until `/quit`, Ctrl-C or Ctrl-D.
    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new().context("failed to start line editor")?;
        let mut stdout = std::io::stdout();

        writeln!(stdout, "askpdf: upload PDFs with /upload <path>, then ask away. /help for commands.")?;

        loop {
            let prompt = match self.session.selected() {
                Some(doc) => format!("{}> ", doc.file_name),
                None => "> ".to_string(),
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    if self.dispatch(&line, &mut stdout).await? == Flow::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(e).context("failed to read input"),
            }
        }

        Ok(())
    }

    /// Handle one line of input. Action failures are printed and the loop
    /// continues; only a failure to print ends it.
    pub async fn dispatch<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match self.handle(Command::parse(line), out).await {
            Ok(flow) => Ok(flow),
            Err(e) => {
                warn!(error = %e, "command failed");
                writeln!(out, "Error: {e:#}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Invalid(message) => writeln!(out, "{message}")?,
            Command::Upload(paths) => {
                let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
                self.upload(&paths, out).await?;
            }
            Command::Remove(name) => {
                match self.assistant.remove(&mut self.session, &name).await? {
                    Some(entry) => writeln!(out, "Removed {}", entry.file_name)?,
                    None => writeln!(out, "No uploaded file named '{name}'")?,
                }
                for entry in self.session.pending_purge() {
                    writeln!(
                        out,
                        "Index records for {} could not be deleted yet; retrying on the next removal",
                        entry.file_name
                    )?;
                }
            }
            Command::Docs => self.list_documents(out)?,
            Command::Select(target) => {
                let entry = match target.parse::<usize>() {
                    Ok(n) if n >= 1 => self.session.select_index(n - 1)?,
                    _ => self.session.select(&target)?,
                };
                writeln!(out, "Asking about {}", entry.file_name)?;
            }
            Command::History => {
                let Some(doc) = self.selected(out)? else { return Ok(Flow::Continue) };
                let history = self.assistant.history(&self.session, &doc.id)?;
                if history.is_empty() {
                    writeln!(out, "No questions asked about {} yet.", doc.file_name)?;
                }
                for (i, entry) in history.iter().enumerate() {
                    writeln!(out, "Q{}: {}", i + 1, entry.question)?;
                    writeln!(out, "A{}: {}", i + 1, entry.answer)?;
                }
            }
            Command::Clear => {
                let Some(doc) = self.selected(out)? else { return Ok(Flow::Continue) };
                self.assistant.clear_history(&mut self.session, &doc.id)?;
                writeln!(out, "Cleared history for {}", doc.file_name)?;
            }
            Command::Ask(question) => {
                let Some(doc) = self.selected(out)? else { return Ok(Flow::Continue) };
                let answer = self.assistant.ask(&mut self.session, &doc.id, &question).await?;
                reveal(out, &answer.text, self.typing_delay).await?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Read and upload files in order, stopping at the first failure.
    pub async fn upload<W: Write>(&mut self, paths: &[PathBuf], out: &mut W) -> Result<()> {
        for path in paths {
            let name = file_name(path)?;
            if self.session.contains_file(&name) {
                writeln!(out, "{name} is already uploaded")?;
                continue;
            }

            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;

            writeln!(out, "Indexing {name}...")?;
            let file = UploadedFile::new(name, bytes);
            match self.assistant.upload_file(&mut self.session, file).await? {
                UploadOutcome::Indexed(entry) => {
                    writeln!(out, "Indexed {} ({} chunks)", entry.file_name, entry.chunk_count)?
                }
                UploadOutcome::Skipped { file_name } => {
                    writeln!(out, "{file_name} is already uploaded")?
                }
            }
        }
        Ok(())
    }

    fn list_documents<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.session.is_empty() {
            writeln!(out, "No files uploaded.")?;
            return Ok(());
        }
        let selected = self.session.selected().map(|d| d.id.as_str());
        for (i, doc) in self.session.documents().iter().enumerate() {
            let marker = if Some(doc.id.as_str()) == selected { '*' } else { ' ' };
            writeln!(out, "{marker} {}. {} ({} chunks)", i + 1, doc.file_name, doc.chunk_count)?;
        }
        Ok(())
    }

    fn selected<W: Write>(&self, out: &mut W) -> Result<Option<DocumentEntry>> {
        let doc = self.session.selected().cloned();
        if doc.is_none() {
            writeln!(out, "Upload a PDF first: /upload <path>")?;
        }
        Ok(doc)
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))
}
