use crate::core::io::traits::DataFile;
use crate::core::models::range::{DomainRange, ParseRangeError};
use std::io::{self, BufRead, Write};
use thiserror::Error;

const LOCATION_PREFIX: &str = "Location:";

/// One annotated sequence in a location file.
///
/// ```text
/// >P04637
/// Location: 102-292
/// ```
///
/// Lines that are neither a header nor a `Location:` line (e.g. "No valid DBD
/// locations found.") are kept verbatim as notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationRecord {
    pub header: String,
    pub ranges: Vec<DomainRange>,
    pub notes: Vec<String>,
}

impl LocationRecord {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.trim().trim_start_matches('>').to_string(),
            ..Default::default()
        }
    }

    /// The identifier part of the header (text before the first whitespace).
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid location on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseRangeError,
    },
    #[error("Line {line} appears before any '>' header")]
    MissingHeader { line: usize },
}

pub struct LocationFile;

impl DataFile for LocationFile {
    type Content = Vec<LocationRecord>;
    type Error = LocationError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut records: Vec<LocationRecord> = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('>') {
                records.push(LocationRecord::new(trimmed));
                continue;
            }
            let record = records
                .last_mut()
                .ok_or(LocationError::MissingHeader { line: line_num })?;
            match trimmed.strip_prefix(LOCATION_PREFIX) {
                Some(rest) => {
                    let range = rest.trim().parse().map_err(|source| LocationError::Parse {
                        line: line_num,
                        source,
                    })?;
                    record.ranges.push(range);
                }
                None => record.notes.push(trimmed.to_string()),
            }
        }
        Ok(records)
    }
}

impl LocationFile {
    pub fn write_to(records: &[LocationRecord], writer: &mut impl Write) -> io::Result<()> {
        for record in records {
            writeln!(writer, ">{}", record.header)?;
            for range in &record.ranges {
                writeln!(writer, "{} {}", LOCATION_PREFIX, range)?;
            }
            for note in &record.notes {
                writeln!(writer, "{}", note)?;
            }
        }
        Ok(())
    }
}
