use crate::core::io::traits::MolecularFile;
use crate::core::models::molecule::{Atom, Molecule};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Header declares {expected} atoms but the file ends after {found}")]
    Truncated { expected: usize, found: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{value}'")]
    InvalidAtomCount { value: String },
    #[error("Invalid {axis} coordinate '{value}'")]
    InvalidCoordinate { axis: char, value: String },
    #[error("Atom record needs a symbol and three coordinates")]
    MissingField,
}

/// Parses a coordinate, accepting the `*^` exponent marker some datasets use
/// (`1.5*^-6` = `1.5e-6`).
fn parse_coordinate(token: &str) -> Option<f64> {
    if token.contains("*^") {
        token.replace("*^", "e").parse().ok()
    } else {
        token.parse().ok()
    }
}

/// XYZ geometries: an atom-count line, a free-form comment line, then one
/// `symbol x y z` record per atom in Ångström. Columns after `z` are ignored.
pub struct XyzFile;

impl MolecularFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut lines = reader.lines();

        let header = lines.next().transpose()?.unwrap_or_default();
        let count_token = header.trim();
        let count: usize = count_token.parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidAtomCount {
                value: count_token.to_string(),
            },
        })?;

        let comment = lines
            .next()
            .transpose()?
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let mut molecule = Molecule::new("");
        molecule.set_comment(comment);

        for index in 0..count {
            let line_num = index + 3;
            let Some(line) = lines.next().transpose()? else {
                return Err(XyzError::Truncated {
                    expected: count,
                    found: index,
                });
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::MissingField,
                });
            }

            let mut coords = [0.0; 3];
            for (axis_idx, axis) in ['x', 'y', 'z'].into_iter().enumerate() {
                let token = fields[axis_idx + 1];
                coords[axis_idx] = parse_coordinate(token).ok_or_else(|| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidCoordinate {
                        axis,
                        value: token.to_string(),
                    },
                })?;
            }

            molecule.push_atom(Atom::new(
                fields[0],
                Point3::new(coords[0], coords[1], coords[2]),
            ));
        }

        Ok(molecule)
    }

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", molecule.len())?;
        writeln!(writer, "{}", molecule.comment().unwrap_or(molecule.name()))?;
        for atom in molecule.atoms() {
            let p = atom.position;
            writeln!(
                writer,
                "{:<2} {:>14.8} {:>14.8} {:>14.8}",
                atom.symbol, p.x, p.y, p.z
            )?;
        }
        Ok(())
    }
}
