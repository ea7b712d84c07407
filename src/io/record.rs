//! Fixed-size numeric record emission.
//!
//! ASCII rows are single-space separated and newline terminated. Integers are
//! right-justified to a field width; floats use the solver's `%9f` layout
//! (minimum width 9, six decimals). Binary rows are the raw little-endian
//! bytes of the values with no separators.

use crate::export_error::AdsExportError;
use bytemuck::Pod;
use std::fmt;
use std::io::Write;

/// Width of every `.REST` header line.
pub const HEADER_LINE_WIDTH: usize = 15;
/// Title length in binary files.
pub const BINARY_TITLE_WIDTH: usize = 80;

/// Output encoding for the `.REST` file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Encoding {
    #[default]
    Ascii,
    Binary,
}

/// Requested byte order for binary output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Binary records are the native bytes; only little-endian hosts match
    /// the ADS layout.
    pub fn check_supported(self) -> Result<(), AdsExportError> {
        if self == ByteOrder::LittleEndian && cfg!(target_endian = "little") {
            Ok(())
        } else {
            Err(AdsExportError::UnsupportedByteOrder)
        }
    }
}

/// A count or 0-based index as a record field.
pub fn record_field(value: usize, what: &'static str) -> Result<u32, AdsExportError> {
    u32::try_from(value).map_err(|_| AdsExportError::IndexOverflow { what, value })
}

/// A 0-based index as a 1-based record field.
pub fn one_based_field(index: usize, what: &'static str) -> Result<u32, AdsExportError> {
    index
        .checked_add(1)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(AdsExportError::IndexOverflow { what, value: index })
}

/// Numeric element kinds a record can hold.
pub trait RecordValue: Pod {
    /// Write one value in ASCII form using `width` as the minimum width.
    fn write_ascii<W: Write>(&self, writer: &mut W, width: usize) -> std::io::Result<()>;
}

impl RecordValue for u32 {
    fn write_ascii<W: Write>(&self, writer: &mut W, width: usize) -> std::io::Result<()> {
        write!(writer, "{:>width$}", self)
    }
}

impl RecordValue for f32 {
    fn write_ascii<W: Write>(&self, writer: &mut W, width: usize) -> std::io::Result<()> {
        write!(writer, "{:>width$.6}", self)
    }
}

/// Float field width (`%9f`).
pub const FLOAT_WIDTH: usize = 9;

/// Record writer over an open output stream.
pub struct RecordWriter<W: Write> {
    writer: W,
    encoding: Encoding,
}

impl<W: Write> fmt::Debug for RecordWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordWriter")
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W, encoding: Encoding) -> Self {
        Self {
            writer,
            encoding,
        }
    }

    fn write_row<T: RecordValue>(
        &mut self,
        values: &[T],
        width: usize,
    ) -> Result<(), AdsExportError> {
        match self.encoding {
            Encoding::Binary => {
                self.writer.write_all(bytemuck::cast_slice(values))?;
            }
            Encoding::Ascii => {
                if let Some((last, head)) = values.split_last() {
                    for value in head {
                        value.write_ascii(&mut self.writer, width)?;
                        self.writer.write_all(b" ")?;
                    }
                    last.write_ascii(&mut self.writer, width)?;
                }
                self.writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    /// Write an integer row with minimum field width `width`.
    pub fn write_u32s(&mut self, values: &[u32], width: usize) -> Result<(), AdsExportError> {
        self.write_row(values, width)
    }

    /// Write a float row.
    pub fn write_f32s(&mut self, values: &[f32]) -> Result<(), AdsExportError> {
        self.write_row(values, FLOAT_WIDTH)
    }

    /// A header line of fifteen zeros.
    pub fn write_zero_line(&mut self) -> Result<(), AdsExportError> {
        self.write_u32s(&[0u32; HEADER_LINE_WIDTH], 1)
    }

    /// Title line: fixed 80 bytes in binary, text plus a blank line in ASCII.
    pub fn write_title(&mut self, title: &str) -> Result<(), AdsExportError> {
        match self.encoding {
            Encoding::Binary => {
                let mut bytes = [b' '; BINARY_TITLE_WIDTH];
                for (slot, byte) in bytes.iter_mut().zip(title.bytes()) {
                    *slot = byte;
                }
                self.writer.write_all(&bytes)?;
            }
            Encoding::Ascii => {
                write!(self.writer, "{title}\n\n")?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), AdsExportError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
