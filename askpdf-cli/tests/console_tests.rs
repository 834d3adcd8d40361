//! Console command handling against in-memory services.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use askpdf_cli::{Console, Flow};
use askpdf_rag::{
    EmbeddingProvider, GenerationParams, InMemoryVectorStore, PdfAssistant, RagPipeline, Result,
    TextExtractor, TextGenerator,
};
use async_trait::async_trait;

/// Counts vowels; enough to make embeddings differ between texts.
struct VowelEmbedder;

#[async_trait]
impl EmbeddingProvider for VowelEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let count = |c: char| text.chars().filter(|&x| x.eq_ignore_ascii_case(&c)).count() as f32;
        Ok(vec![count('a') + 1.0, count('e'), count('i'), count('o'), count('u')])
    }

    fn dimensions(&self) -> usize {
        5
    }
}

struct PlainText;

impl TextExtractor for PlainText {
    fn extract(&self, _file_name: &str, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Answers with the first context line of the prompt.
struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str, _params: GenerationParams) -> Result<String> {
        let context = prompt.split("Context:\n").nth(1).unwrap_or_default();
        Ok(context.lines().next().unwrap_or_default().to_string())
    }

    fn model(&self) -> &str {
        "echo"
    }
}

fn console() -> Console {
    let pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(VowelEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    let assistant = PdfAssistant::new(Arc::new(PlainText), pipeline, Arc::new(EchoGenerator));
    Console::new(assistant, Duration::ZERO)
}

/// Write `text` to a fresh temp file named `name` and return its path.
fn temp_pdf(test: &str, name: &str, text: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("askpdf-{}-{test}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

async fn run(console: &mut Console, line: &str) -> (Flow, String) {
    let mut out = Vec::new();
    let flow = console.dispatch(line, &mut out).await.unwrap();
    (flow, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn upload_ask_and_review_history() {
    let mut console = console();
    let cats = temp_pdf("history", "cats.pdf", "Cats are mammals. Dogs are mammals. Fish are not.");

    let (_, out) = run(&mut console, &format!("/upload {}", cats.display())).await;
    assert!(out.contains("Indexed cats.pdf (1 chunks)"), "{out}");

    let (_, out) = run(&mut console, "/history").await;
    assert_eq!(out, "No questions asked about cats.pdf yet.\n");

    let (_, out) = run(&mut console, "What are cats?").await;
    assert_eq!(out, "Cats are mammals. Dogs are mammals. Fish are not.\n");

    let (_, out) = run(&mut console, "/history").await;
    assert_eq!(
        out,
        "Q1: What are cats?\nA1: Cats are mammals. Dogs are mammals. Fish are not.\n"
    );

    let (_, out) = run(&mut console, "/clear").await;
    assert_eq!(out, "Cleared history for cats.pdf\n");
    let (_, out) = run(&mut console, "/history").await;
    assert!(out.starts_with("No questions asked"));
}

#[tokio::test]
async fn questions_need_an_upload_first() {
    let mut console = console();

    let (flow, out) = run(&mut console, "What are cats?").await;

    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "Upload a PDF first: /upload <path>\n");
}

#[tokio::test]
async fn docs_select_and_remove() {
    let mut console = console();
    let a = temp_pdf("select", "a.pdf", "Apples are fruit.");
    let b = temp_pdf("select", "b.pdf", "Bananas are yellow.");
    run(&mut console, &format!("/upload {} {}", a.display(), b.display())).await;

    let (_, out) = run(&mut console, "/docs").await;
    assert_eq!(out, "* 1. a.pdf (1 chunks)\n  2. b.pdf (1 chunks)\n");

    let (_, out) = run(&mut console, "/select 2").await;
    assert_eq!(out, "Asking about b.pdf\n");
    assert_eq!(console.session().selected().unwrap().file_name, "b.pdf");

    let (_, out) = run(&mut console, "/remove b.pdf").await;
    assert_eq!(out, "Removed b.pdf\n");
    assert_eq!(console.session().selected().unwrap().file_name, "a.pdf");

    let (_, out) = run(&mut console, "/select nope.pdf").await;
    assert!(out.starts_with("Error: Unknown document"), "{out}");
}

#[tokio::test]
async fn duplicate_upload_is_reported_and_skipped() {
    let mut console = console();
    let a = temp_pdf("dup", "a.pdf", "Apples are fruit.");
    run(&mut console, &format!("/upload {}", a.display())).await;

    let (_, out) = run(&mut console, &format!("/upload {}", a.display())).await;

    assert_eq!(out, "a.pdf is already uploaded\n");
    assert_eq!(console.session().documents().len(), 1);
}

#[tokio::test]
async fn failures_are_printed_and_the_loop_continues() {
    let mut console = console();

    let (flow, out) = run(&mut console, "/upload /definitely/missing/file.pdf").await;
    assert_eq!(flow, Flow::Continue);
    assert!(out.starts_with("Error: failed to read /definitely/missing/file.pdf"), "{out}");

    let (flow, out) = run(&mut console, "/bogus").await;
    assert_eq!(flow, Flow::Continue);
    assert!(out.contains("unknown command"));

    let (flow, _) = run(&mut console, "/quit").await;
    assert_eq!(flow, Flow::Quit);
}
