use crate::core::io::traits::DataFile;
use crate::core::models::sequence::SequenceRecord;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const LINE_WIDTH: usize = 60;
const GAP: char = '-';

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Sequence data on line {line} appears before any '>' header")]
    MissingHeader { line: usize },
}

/// Multi-record FASTA reader.
///
/// Blank lines are ignored and wrapped sequence lines are joined. A file without any
/// record parses to an empty list; callers decide whether that is an error.
pub struct FastaFile;

impl DataFile for FastaFile {
    type Content = Vec<SequenceRecord>;
    type Error = FastaError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut records = Vec::new();
        let mut header: Option<String> = None;
        let mut body = String::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('>') {
                if let Some(h) = header.take() {
                    records.push(SequenceRecord::new(&h, &body));
                    body.clear();
                }
                header = Some(trimmed.to_string());
            } else if header.is_some() {
                body.push_str(trimmed);
            } else {
                return Err(FastaError::MissingHeader { line: line_num + 1 });
            }
        }
        if let Some(h) = header {
            records.push(SequenceRecord::new(&h, &body));
        }
        Ok(records)
    }
}

impl FastaFile {
    /// Writes records as FASTA with 60-column sequence lines.
    pub fn write_to(records: &[SequenceRecord], writer: &mut impl Write) -> io::Result<()> {
        for record in records {
            writeln!(writer, ">{}", record.description)?;
            let bytes = record.sequence().as_bytes();
            for chunk in bytes.chunks(LINE_WIDTH) {
                writer.write_all(chunk)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

/// Reader for gapped multiple-sequence alignments in FASTA layout.
///
/// Each aligned sequence is returned with its gap characters removed, which turns
/// the alignment into a list of plain exemplar sequences.
pub struct AlignmentFile;

impl DataFile for AlignmentFile {
    type Content = Vec<String>;
    type Error = FastaError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let records = FastaFile::read_from(reader)?;
        Ok(records
            .iter()
            .map(|r| r.sequence().chars().filter(|&c| c != GAP).collect::<String>())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_multiple_wrapped_records() {
        let text = ">P1 first\nMEEP\nQSD\n\n>P2\nAAAA\n";
        let records = FastaFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "P1");
        assert_eq!(records[0].sequence(), "MEEPQSD");
        assert_eq!(records[1].sequence(), "AAAA");
    }

    #[test]
    fn header_only_record_has_empty_sequence() {
        let records = FastaFile::read_from(&mut Cursor::new(">P1\n")).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());
    }

    #[test]
    fn empty_input_yields_no_records() {
        let records = FastaFile::read_from(&mut Cursor::new("")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn sequence_before_header_is_rejected() {
        let result = FastaFile::read_from(&mut Cursor::new("MEEP\n>P1\nAA\n"));
        assert!(matches!(result, Err(FastaError::MissingHeader { line: 1 })));
    }

    #[test]
    fn written_records_read_back_identically() {
        let long = "A".repeat(130);
        let records = vec![SequenceRecord::new(">X1 desc", &long)];
        let mut out = Vec::new();
        FastaFile::write_to(&records, &mut out).unwrap();

        let text = String::from_utf8(out.clone()).unwrap();
        assert_eq!(text.lines().count(), 4);
        let back = FastaFile::read_from(&mut Cursor::new(out)).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn alignment_sequences_are_ungapped() {
        let text = ">s1\nRK--AF\n>s2\n-KR-\n>s3\n----\n";
        let sequences = AlignmentFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(sequences, vec!["RKAF".to_string(), "KR".to_string()]);
    }
}
