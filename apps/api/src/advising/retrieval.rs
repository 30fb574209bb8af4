//! Retrieval context: chunking plus a small TF-IDF index per session.
//!
//! The profile summary and the optional uploaded document are split into
//! overlapping chunks. A chat question pulls the `k` best chunks, which are
//! formatted into the context block of the retrieval prompt.
//!
//! Every indexed chunk is a candidate: chunks with no term overlap still fill
//! the remaining slots (in insertion order), so the profile always reaches the
//! advisor.

use std::collections::{HashMap, HashSet};

/// Source name under which the profile summary is indexed.
pub const PROFILE_SOURCE: &str = "profil_siswa.txt";
/// Chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 8;
/// Rendered when there is nothing to retrieve.
pub const NO_CONTEXT: &str = "Tidak ada konteks tambahan.";

/// Split preference, coarsest first. A hard cut is the last resort.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

const STOPWORDS: &[&str] = &[
    // Indonesian
    "yang", "dan", "untuk", "dengan", "saya", "apa", "ini", "itu", "dari", "pada", "atau", "juga",
    "akan", "bisa", "kalau", "tidak", "ada", "saja", "lebih", "kurang",
    // English
    "the", "and", "for", "with", "what", "which", "this", "that", "are", "how",
];

/// Chunk sizes are measured in characters, not bytes.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: 2000,
            overlap_chars: 300,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}

impl Chunker {
    /// Overlap is clamped below the chunk size so every step makes progress.
    pub fn new(config: ChunkConfig) -> Self {
        let max_chars = config.max_chars.max(1);
        Self {
            config: ChunkConfig {
                max_chars,
                overlap_chars: config.overlap_chars.min(max_chars - 1),
            },
        }
    }

    /// Splits `text` into trimmed, non-empty chunks of at most `max_chars`.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let ChunkConfig {
            max_chars,
            overlap_chars,
        } = self.config;

        // Byte offset of every char start, plus the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            if total - start <= max_chars {
                push_trimmed(&mut chunks, &text[bounds[start]..]);
                break;
            }

            let mut end = start + max_chars;
            let window = &text[bounds[start]..bounds[end]];
            for sep in SEPARATORS {
                let Some(pos) = window.rfind(sep) else { continue };
                let cut_byte = bounds[start] + pos + sep.len();
                // Separators are ASCII, so the cut always lands on a char start.
                if let Ok(cut) = bounds.binary_search(&cut_byte) {
                    if cut - start > overlap_chars {
                        end = cut;
                        break;
                    }
                }
            }

            push_trimmed(&mut chunks, &text[bounds[start]..bounds[end]]);
            start = end - overlap_chars;
        }

        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        chunks.push(piece.to_string());
    }
}

/// Lowercases, splits on non-alphanumerics, keeps terms of 3+ chars.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub source: String,
    pub text: String,
    term_freq: HashMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ContextIndex {
    chunks: Vec<IndexedChunk>,
    doc_freq: HashMap<String, usize>,
}

impl ContextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks `text` and indexes every chunk under `source`.
    pub fn add_document(&mut self, source: &str, text: &str, chunker: &Chunker) {
        for piece in chunker.chunk(text) {
            let mut term_freq: HashMap<String, usize> = HashMap::new();
            for term in tokenize(&piece) {
                *term_freq.entry(term).or_insert(0) += 1;
            }
            for term in term_freq.keys() {
                *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            self.chunks.push(IndexedChunk {
                source: source.to_string(),
                text: piece,
                term_freq,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns up to `k` chunks by descending TF-IDF score; ties keep
    /// insertion order.
    pub fn retrieve(&self, query: &str, k: usize) -> Vec<&IndexedChunk> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        let total_docs = self.chunks.len().max(1) as f64;

        let mut scored: Vec<(f64, &IndexedChunk)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let score: f64 = query_terms
                    .iter()
                    .filter_map(|qt| {
                        let tf = *chunk.term_freq.get(qt)? as f64;
                        let df = *self.doc_freq.get(qt).unwrap_or(&1) as f64;
                        Some(tf * ((total_docs / df).ln() + 1.0))
                    })
                    .sum();
                (score, chunk)
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(k).map(|(_, c)| c).collect()
    }
}

/// Renders retrieved chunks as numbered context blocks.
pub fn format_context(chunks: &[&IndexedChunk]) -> String {
    if chunks.is_empty() {
        return NO_CONTEXT.to_string();
    }
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| format!("--- Konteks {} ---\n{}", i + 1, c.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(max_chars: usize, overlap_chars: usize) -> Chunker {
        Chunker::new(ChunkConfig {
            max_chars,
            overlap_chars,
        })
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = Chunker::default().chunk("Kelas: XI\nMinat: Sains");
        assert_eq!(chunks, vec!["Kelas: XI\nMinat: Sains".to_string()]);
    }

    #[test]
    fn test_blank_text_yields_no_chunks() {
        assert!(Chunker::default().chunk("  \n ").is_empty());
    }

    #[test]
    fn test_prefers_paragraph_boundary() {
        let text = "Alpha paragraph one.\n\nBeta paragraph two is here.\n\nGamma three.";
        let chunks = small(40, 5).chunk(text);
        assert_eq!(chunks[0], "Alpha paragraph one.");
        assert!(chunks.last().unwrap().ends_with("Gamma three."));
        assert!(chunks.iter().all(|c| c.chars().count() <= 40));
    }

    #[test]
    fn test_hard_cut_keeps_overlap() {
        let text = "0123456789".repeat(5);
        let chunks = small(20, 5).chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(&chunks[0][15..], &chunks[1][..5]);
        assert_eq!(&chunks[1][15..], &chunks[2][..5]);
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let text = "é".repeat(45);
        let chunks = small(20, 3).chunk(&text);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn test_overlap_is_clamped() {
        let chunks = small(4, 10).chunk("abcdefghij");
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
        assert!(chunks.last().unwrap().ends_with('j'));
    }

    #[test]
    fn test_tokenize_drops_short_words_and_stopwords() {
        assert_eq!(
            tokenize("Saya suka Biologi dan AI, untuk kuliah!"),
            vec!["suka", "biologi", "kuliah"]
        );
    }

    #[test]
    fn test_retrieve_ranks_matching_chunk_first() {
        let chunker = Chunker::default();
        let mut index = ContextIndex::new();
        index.add_document(PROFILE_SOURCE, "Minat: Seni & Desain", &chunker);
        index.add_document("rapor.txt", "Juara olimpiade biologi tingkat provinsi", &chunker);

        let hits = index.retrieve("Bagaimana dengan olimpiade biologi?", DEFAULT_TOP_K);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "rapor.txt");
        assert_eq!(hits[1].source, PROFILE_SOURCE);
    }

    #[test]
    fn test_retrieve_without_overlap_keeps_insertion_order() {
        let chunker = Chunker::default();
        let mut index = ContextIndex::new();
        index.add_document(PROFILE_SOURCE, "Kelas: XII", &chunker);
        index.add_document("catatan.txt", "Ikut ekskul robotik", &chunker);

        let hits = index.retrieve("zzz", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, PROFILE_SOURCE);
    }

    #[test]
    fn test_format_context() {
        assert_eq!(format_context(&[]), NO_CONTEXT);

        let chunker = Chunker::default();
        let mut index = ContextIndex::new();
        index.add_document(PROFILE_SOURCE, "Kelas: X", &chunker);
        index.add_document("a.txt", "Suka menggambar", &chunker);
        let hits = index.retrieve("", DEFAULT_TOP_K);
        assert_eq!(
            format_context(&hits),
            "--- Konteks 1 ---\nKelas: X\n--- Konteks 2 ---\nSuka menggambar"
        );
    }
}
