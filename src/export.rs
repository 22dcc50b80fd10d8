//! Export collaborator seam.
//!
//! Exporters consume the containers' row iterator protocol; the output
//! format is entirely the collaborator's concern. Labeled containers
//! feed rows with the label appended as the last element.

use std::io::Write;

use crate::dataset::Row;
use crate::error::{Error, Result};

/// A sink for a container's rows.
pub trait Exporter {
    /// Consumes the rows, one at a time, in container order.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    fn export(&mut self, rows: &mut dyn Iterator<Item = Row>) -> Result<()>;
}

/// Writes one JSON array per line (JSONL). Integers serialize as
/// numbers, categorical values as strings.
pub struct JsonLinesExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesExporter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer
            .flush()
            .map_err(|e| Error::export(e.to_string()))?;
        Ok(self.writer)
    }
}

impl<W: Write> Exporter for JsonLinesExporter<W> {
    fn export(&mut self, rows: &mut dyn Iterator<Item = Row>) -> Result<()> {
        for row in rows {
            serde_json::to_writer(&mut self.writer, &row)
                .map_err(|e| Error::export(e.to_string()))?;
            self.writer
                .write_all(b"\n")
                .map_err(|e| Error::export(e.to_string()))?;
        }
        Ok(())
    }
}
