use crate::core::io::traits::DataFile;
use crate::core::models::range::{DomainRange, ParseRangeError};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const ENTRY_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ',';

/// One protein and its residue ranges, written as `NAME,s-e,s-e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEntry {
    pub protein: String,
    pub ranges: Vec<DomainRange>,
}

/// A custom pairing line such as `EP300,1660-1840;TP53,1-61,64-92`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairLine {
    pub entries: Vec<PairEntry>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairParseErrorKind {
    #[error("Entry '{0}' has no protein name")]
    MissingProtein(String),
    #[error("Entry for '{0}' lists no ranges")]
    MissingRanges(String),
    #[error(transparent)]
    Range(#[from] ParseRangeError),
}

#[derive(Debug, Error)]
pub enum PairError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PairParseErrorKind },
}

impl FromStr for PairEntry {
    type Err = PairParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split(FIELD_SEPARATOR);
        let protein = fields.next().unwrap_or_default().trim();
        if protein.is_empty() {
            return Err(PairParseErrorKind::MissingProtein(s.to_string()));
        }
        let ranges = fields
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| f.parse::<DomainRange>())
            .collect::<Result<Vec<_>, _>>()?;
        if ranges.is_empty() {
            return Err(PairParseErrorKind::MissingRanges(protein.to_string()));
        }
        Ok(Self {
            protein: protein.to_string(),
            ranges,
        })
    }
}

impl fmt::Display for PairEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.protein)?;
        for range in &self.ranges {
            write!(f, "{}{}", FIELD_SEPARATOR, range)?;
        }
        Ok(())
    }
}

impl FromStr for PairLine {
    type Err = PairParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .trim()
            .split(ENTRY_SEPARATOR)
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}

impl fmt::Display for PairLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", ENTRY_SEPARATOR)?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Reader and writer for newline-separated pair lists.
pub struct PairListFile;

impl DataFile for PairListFile {
    type Content = Vec<PairLine>;
    type Error = PairError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut lines = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed = line.parse().map_err(|kind| PairError::Parse {
                line: line_num + 1,
                kind,
            })?;
            lines.push(parsed);
        }
        Ok(lines)
    }
}

impl PairListFile {
    /// Writes one pair line per row, newline-separated, without a trailing newline.
    pub fn write_to(lines: &[PairLine], writer: &mut impl Write) -> io::Result<()> {
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            write!(writer, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_target_and_partner_entries() {
        let line: PairLine = "EP300,1660-1840;TP53,1-61,64-92".parse().unwrap();
        assert_eq!(line.entries.len(), 2);
        assert_eq!(line.entries[0].protein, "EP300");
        assert_eq!(line.entries[0].ranges, vec![DomainRange::new(1660, 1840)]);
        assert_eq!(
            line.entries[1].ranges,
            vec![DomainRange::new(1, 61), DomainRange::new(64, 92)]
        );
        assert_eq!(line.to_string(), "EP300,1660-1840;TP53,1-61,64-92");
    }

    #[test]
    fn entry_without_ranges_is_rejected() {
        let result = "EP300,1660-1840;TP53".parse::<PairLine>();
        assert_eq!(result, Err(PairParseErrorKind::MissingRanges("TP53".into())));
    }

    #[test]
    fn file_errors_carry_line_numbers() {
        let text = "A,1-5;B,2-9\n\nA,1-5;B,9-2\n";
        let err = PairListFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            PairError::Parse {
                line: 3,
                kind: PairParseErrorKind::Range(ParseRangeError::Inverted { .. })
            }
        ));
    }

    #[test]
    fn writes_lines_without_trailing_newline() {
        let lines = vec![
            "A,1-5;B,2-9".parse::<PairLine>().unwrap(),
            "A,1-5;C,7-8".parse::<PairLine>().unwrap(),
        ];
        let mut out = Vec::new();
        PairListFile::write_to(&lines, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A,1-5;B,2-9\nA,1-5;C,7-8");
    }
}
