use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for single-molecule file formats.
pub trait MolecularFile {
    type Error: Error + From<io::Error>;

    /// Parses one molecule. The reader has no notion of a file name, so the molecule's
    /// name is left empty.
    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error>;

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a molecule from a file and names it after the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut molecule = Self::read_from(&mut reader)?;
        if let Some(stem) = path.file_stem() {
            molecule.set_name(&stem.to_string_lossy());
        }
        Ok(molecule)
    }

    fn write_to_path<P: AsRef<Path>>(molecule: &Molecule, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
