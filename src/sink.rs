//! Consumers for parsed weather records.
//!
//! The parser's only artifact is the [`WeatherRecord`]; a [`RecordSink`] is
//! where it goes next. The crate ships a JSON writer; queues and stores are
//! up to the caller.

use anyhow::Result;
use std::io::Write;

use crate::record::WeatherRecord;

/// A destination for parsed weather records.
pub trait RecordSink {
    fn publish(&mut self, record: &WeatherRecord) -> Result<()>;
}

/// Writes each record as one JSON document followed by a newline.
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    /// Compact, single-line JSON.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indented JSON for human consumption.
    pub fn pretty(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
        }
    }
}

impl<W: Write> RecordSink for JsonSink<W> {
    fn publish(&mut self, record: &WeatherRecord) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, record)?;
        } else {
            serde_json::to_writer(&mut self.writer, record)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
