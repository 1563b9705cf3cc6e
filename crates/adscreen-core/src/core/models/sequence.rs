/// A protein sequence read from a FASTA-like file.
///
/// The record is immutable once loaded. `id` is the first whitespace-delimited
/// token of the header line (without the leading `>`), `description` is the full
/// header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub description: String,
    sequence: String,
}

impl SequenceRecord {
    /// Creates a record from a header (with or without the leading `>`) and a sequence body.
    ///
    /// Whitespace inside the body is removed so that wrapped FASTA lines can be passed
    /// through unchanged.
    pub fn new(header: &str, sequence: &str) -> Self {
        let description = header.trim().trim_start_matches('>').trim().to_string();
        let id = description
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let sequence = sequence.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            id,
            description,
            sequence,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns the 0-based offset of the first exact occurrence of `fragment`.
    ///
    /// An empty fragment never matches.
    pub fn find(&self, fragment: &str) -> Option<usize> {
        if fragment.is_empty() {
            return None;
        }
        self.sequence.find(fragment)
    }
}
