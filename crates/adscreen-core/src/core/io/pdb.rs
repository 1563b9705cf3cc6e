use crate::core::io::traits::DataFile;
use crate::core::models::structure::{Structure, StructureBuilder};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

const MIN_ATOM_LINE_LEN: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coord(line: &str, line_num: usize, start: usize, columns: &str) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, start + 8);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

/// Fixed-column PDB coordinate reader.
///
/// Only the first model is read (parsing stops at the first `ENDMDL` or `END`).
/// Alternate locations other than blank or `A` are skipped. A residue starts whenever
/// the residue number or insertion code changes within a chain.
pub struct PdbFile;

impl DataFile for PdbFile {
    type Content = Structure;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut current_chain: Option<char> = None;
        let mut current_residue: Option<(isize, char)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_ATOM_LINE_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = line.get(16..17).unwrap_or(" ");
                    if alt_loc != " " && alt_loc != "A" {
                        continue;
                    }

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let name = slice_and_trim(&line, 12, 16);
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = line
                        .get(21..22)
                        .and_then(|s| s.chars().next())
                        .unwrap_or(' ');
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let insertion = line
                        .get(26..27)
                        .and_then(|s| s.chars().next())
                        .unwrap_or(' ');

                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "7-11".into(),
                            value: serial_str.into(),
                        },
                    })?;
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let x = parse_coord(&line, line_num, 30, "31-38")?;
                    let y = parse_coord(&line, line_num, 38, "39-46")?;
                    let z = parse_coord(&line, line_num, 46, "47-54")?;

                    if current_chain != Some(chain_id) {
                        builder.start_chain(chain_id);
                        current_chain = Some(chain_id);
                        current_residue = None;
                    }
                    if current_residue != Some((res_seq, insertion)) {
                        builder.start_residue(res_seq, res_name);
                        current_residue = Some((res_seq, insertion));
                    }
                    builder.add_atom(serial, name, Point3::new(x, y, z));
                }
                "TER" => {
                    current_residue = None;
                }
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if builder.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn atom_line(serial: usize, name: &str, res: &str, chain: char, seq: isize, xyz: [f64; 3]) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00 90.00           C",
            serial, name, res, chain, seq, xyz[0], xyz[1], xyz[2]
        )
    }

    fn sample_pdb() -> String {
        [
            "HEADER    TEST".to_string(),
            atom_line(1, "N", "ALA", 'A', 1, [0.0, 0.0, 0.0]),
            atom_line(2, "CA", "ALA", 'A', 1, [1.5, 0.0, 0.0]),
            atom_line(3, "CA", "GLY", 'A', 2, [3.0, 0.0, 0.0]),
            "TER".to_string(),
            atom_line(4, "CA", "SER", 'B', 1, [0.0, 4.0, 0.0]),
            "ENDMDL".to_string(),
            atom_line(5, "CA", "SER", 'B', 2, [0.0, 8.0, 0.0]),
            "END".to_string(),
        ]
        .join("\n")
    }

    #[test]
    fn reads_chains_residues_and_coordinates() {
        let structure = PdbFile::read_from(&mut Cursor::new(sample_pdb())).unwrap();
        assert_eq!(structure.chain_lengths(), vec![2, 1]);
        let chain_a = structure.chain('A').unwrap();
        let ca = chain_a.residues()[0].atom("CA").unwrap();
        assert_eq!(ca.serial, 2);
        assert_eq!(ca.position, Point3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn stops_after_first_model() {
        let structure = PdbFile::read_from(&mut Cursor::new(sample_pdb())).unwrap();
        assert_eq!(structure.atom_count(), 4);
    }

    #[test]
    fn alternate_locations_beyond_a_are_skipped() {
        let mut alt_b = atom_line(3, "CA", "ALA", 'A', 1, [9.0, 9.0, 9.0]);
        alt_b.replace_range(16..17, "B");
        let text = [atom_line(1, "CA", "ALA", 'A', 1, [1.0, 0.0, 0.0]), alt_b].join("\n");
        let structure = PdbFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(structure.atom_count(), 1);
    }

    #[test]
    fn short_atom_line_is_rejected() {
        let result = PdbFile::read_from(&mut Cursor::new("ATOM      1  CA  ALA A   1"));
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort
            })
        ));
    }

    #[test]
    fn invalid_coordinate_is_reported_with_columns() {
        let mut line = atom_line(1, "CA", "ALA", 'A', 1, [1.0, 0.0, 0.0]);
        line.replace_range(30..38, "   abcde");
        let err = PdbFile::read_from(&mut Cursor::new(line)).unwrap_err();
        assert!(err.to_string().contains("31-38"));
    }

    #[test]
    fn file_without_atoms_is_rejected() {
        let result = PdbFile::read_from(&mut Cursor::new("HEADER    EMPTY\nEND\n"));
        assert!(matches!(result, Err(PdbError::MissingRecord(_))));
    }
}
