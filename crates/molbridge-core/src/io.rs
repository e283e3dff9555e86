//! Reading and writing molecules: string parsing, lazy file iteration and
//! the multi-molecule `OutputFile`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::errors::{BridgeError, FormatDirection};
use crate::molecule::Molecule;
use crate::toolkit::{lookup_format, Format, Framing, Toolkit};

/// Parse a single molecule from `text`.
///
/// Fails with `UnrecognizedFormat` when `tag` is not registered as an input
/// format of `T`, and with `MalformedInput` when the text is not valid for
/// the declared format.
pub fn read_string<T: Toolkit>(tag: &str, text: &str) -> Result<Molecule<T>, BridgeError> {
    T::ensure_ready()?;
    let format = lookup_format::<T>(FormatDirection::Input, tag)?;
    Ok(Molecule::from_handle(T::parse(format.tag, text)?))
}

/// Iterate over the molecules in a file.
///
/// The path must exist before any parse is attempted (`FileNotFound`
/// otherwise). The returned reader is a pull-based lazy sequence: each
/// molecule is parsed only when requested, the file handle stays open for
/// the reader's lifetime, and the only way to restart is to reopen.
pub fn read_file<T: Toolkit>(
    tag: &str,
    path: impl AsRef<Path>,
) -> Result<MoleculeReader<T>, BridgeError> {
    T::ensure_ready()?;
    let format = lookup_format::<T>(FormatDirection::Input, tag)?;
    let path = path.as_ref();
    if !path.is_file() {
        return Err(BridgeError::FileNotFound(path.to_path_buf()));
    }
    Ok(MoleculeReader {
        reader: BufReader::new(File::open(path)?),
        format,
        done: false,
        _toolkit: PhantomData,
    })
}

/// Lazy molecule iterator over an open file. Order is file order.
#[derive(Debug)]
pub struct MoleculeReader<T: Toolkit> {
    reader: BufReader<File>,
    format: &'static Format,
    done: bool,
    _toolkit: PhantomData<T>,
}

impl<T: Toolkit> MoleculeReader<T> {
    /// Pull the next raw unit according to the format's framing rule.
    fn next_unit(&mut self) -> Result<Option<String>, BridgeError> {
        match self.format.framing {
            Framing::Line => loop {
                let mut line = String::new();
                if self.reader.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim_end_matches(['\n', '\r']);
                if !trimmed.trim().is_empty() {
                    return Ok(Some(trimmed.to_string()));
                }
            },
            Framing::SdRecord => {
                let mut record = String::new();
                loop {
                    let mut line = String::new();
                    if self.reader.read_line(&mut line)? == 0 {
                        if record.trim().is_empty() {
                            return Ok(None);
                        }
                        return Ok(Some(record));
                    }
                    if line.trim_end().starts_with("$$$$") {
                        return Ok(Some(record));
                    }
                    record.push_str(&line);
                }
            }
            Framing::WholeFile => {
                if self.done {
                    return Ok(None);
                }
                self.done = true;
                let mut text = String::new();
                std::io::Read::read_to_string(&mut self.reader, &mut text)?;
                Ok(Some(text))
            }
        }
    }
}

impl<T: Toolkit> Iterator for MoleculeReader<T> {
    type Item = Result<Molecule<T>, BridgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done && self.format.framing != Framing::WholeFile {
            return None;
        }
        match self.next_unit() {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Ok(Some(unit)) => Some(T::parse(self.format.tag, &unit).map(Molecule::from_handle)),
        }
    }
}

/// A file to which multiple molecules are written.
///
/// Bound to one format and path; the existence/overwrite contract is the
/// same as `Molecule::write_file`. Writing after `close` fails with
/// `StreamClosed`; so does a second `close` (the original system left that
/// undefined, here it is simply guarded).
#[derive(Debug)]
pub struct OutputFile<T: Toolkit> {
    format: &'static Format,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    count: usize,
    _toolkit: PhantomData<T>,
}

impl<T: Toolkit> OutputFile<T> {
    pub fn create(
        tag: &str,
        path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<Self, BridgeError> {
        T::ensure_ready()?;
        let format = lookup_format::<T>(FormatDirection::Output, tag)?;
        let path = path.as_ref().to_path_buf();
        if !overwrite && path.is_file() {
            return Err(BridgeError::FileAlreadyExists(path));
        }
        let writer = BufWriter::new(File::create(&path)?);
        Ok(OutputFile { format, path, writer: Some(writer), count: 0, _toolkit: PhantomData })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of molecules appended so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn append(&mut self, molecule: &Molecule<T>) -> Result<(), BridgeError> {
        let writer = self.writer.as_mut().ok_or(BridgeError::StreamClosed)?;
        let mut text = T::serialize(molecule.handle(), self.format.tag)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        writer.write_all(text.as_bytes())?;
        self.count += 1;
        Ok(())
    }

    /// Flush and close. Further `append` or `close` calls fail with
    /// `StreamClosed`.
    pub fn close(&mut self) -> Result<(), BridgeError> {
        let mut writer = self.writer.take().ok_or(BridgeError::StreamClosed)?;
        writer.flush()?;
        Ok(())
    }
}

impl<T: Toolkit> Drop for OutputFile<T> {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
