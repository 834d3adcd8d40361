//! Property tests for sentence chunking.

use askpdf_rag::chunking::{Chunker, SENTENCE_DELIMITER, SentenceChunker, split_sentences};
use askpdf_rag::document::Document;
use proptest::prelude::*;

/// A sentence without surrounding whitespace and without the delimiter.
fn arb_sentence() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,12}", 1..12).prop_map(|words| words.join(" "))
}

fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_sentence(), 1..40).prop_map(|s| s.join(SENTENCE_DELIMITER))
}

mod prop_sentence_chunking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Joining the chunks with a single space restores the text.
        #[test]
        fn chunks_reassemble_the_text(text in arb_text(), limit in 1usize..300) {
            let chunks = split_sentences(&text, limit);
            prop_assert_eq!(chunks.join(" "), text);
        }

        /// Only a chunk holding a single sentence may reach the limit.
        #[test]
        fn multi_sentence_chunks_respect_the_limit(text in arb_text(), limit in 1usize..300) {
            for chunk in split_sentences(&text, limit) {
                if chunk.contains(SENTENCE_DELIMITER) {
                    prop_assert!(
                        chunk.chars().count() <= limit,
                        "chunk of {} chars exceeds limit {}",
                        chunk.chars().count(),
                        limit,
                    );
                }
            }
        }

        #[test]
        fn chunks_are_trimmed_and_non_empty(text in ".{0,400}", limit in 1usize..200) {
            for chunk in split_sentences(&text, limit) {
                prop_assert!(!chunk.is_empty());
                prop_assert_eq!(chunk.trim(), chunk.as_str());
            }
        }
    }
}

#[test]
fn text_under_the_limit_is_a_single_chunk() {
    let text = "The cat sat on the mat. It was warm. ".repeat(10);
    assert!(text.trim().chars().count() < 500);

    let chunks = split_sentences(&text, 500);

    assert_eq!(chunks, vec![text.trim().to_string()]);
}

#[test]
fn thousand_char_sentence_stays_whole() {
    let sentence = "word ".repeat(200);
    let sentence = sentence.trim_end();
    let document = Document::new("long.pdf", format!("Intro. {sentence}. Outro"));

    let chunks = SentenceChunker::new(500).chunk(&document);

    let closed = format!("{sentence}.");
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Intro.", closed.as_str(), "Outro"]);
    assert!(chunks.iter().all(|c| c.document_id == document.id));
}

#[test]
fn chunk_ids_are_unique() {
    let document = Document::new("a.pdf", "One. Two. Three. Four");
    let chunks = SentenceChunker::new(5).chunk(&document);
    let mut ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), chunks.len());
    assert_eq!(chunks.len(), 4);
}
