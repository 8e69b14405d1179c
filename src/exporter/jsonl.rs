// file: src/exporter/jsonl.rs
// description: json lines persistence for processed paper records
// reference: https://jsonlines.org

use crate::error::{PipelineError, Result};
use crate::models::PaperRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{error, info, warn};

/// Writes one JSON object per line. A record that cannot be written is
/// retried once with its text reduced to ASCII, then skipped.
pub struct JsonlWriter<W: Write> {
    writer: W,
    written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| PipelineError::file(path, source))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns whether the record (or its ASCII fallback) was written.
    pub fn write_record(&mut self, record: &PaperRecord) -> bool {
        match self.write_line(record) {
            Ok(()) => {
                self.written += 1;
                true
            }
            Err(e) => {
                warn!("Error writing result for {}: {}", record.filename, e);
                match self.write_line(&record.ascii_only()) {
                    Ok(()) => {
                        self.written += 1;
                        true
                    }
                    Err(e2) => {
                        error!("Failed to write result even with ASCII encoding: {}", e2);
                        false
                    }
                }
            }
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes one serialized record. If the sink fails after accepting part
    /// of the line, the fragment is terminated with a newline so a retry
    /// starts on a fresh line and readers skip the fragment as malformed.
    fn write_line(&mut self, record: &PaperRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut pos = 0;
        while pos < line.len() {
            match self.writer.write(&line[pos..]) {
                Ok(0) => {
                    return Err(self.abandon_line(pos, io::ErrorKind::WriteZero.into()));
                }
                Ok(n) => pos += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.abandon_line(pos, e)),
            }
        }
        Ok(())
    }

    fn abandon_line(&mut self, written: usize, cause: io::Error) -> PipelineError {
        if written > 0
            && let Err(e) = self.writer.write_all(b"\n")
        {
            warn!("Could not terminate partial JSONL line: {}", e);
        }
        cause.into()
    }
}

pub fn write_records(path: &Path, records: &[PaperRecord]) -> Result<usize> {
    let mut writer = JsonlWriter::create(path)?;
    for record in records {
        writer.write_record(record);
    }
    let skipped = records.len() - writer.written();
    if skipped > 0 {
        warn!("{} records could not be written to {}", skipped, path.display());
    }
    let written = writer.finish()?;
    info!("Results saved to {} ({} records)", path.display(), written);
    Ok(written)
}

/// Loads every parseable record, logging and skipping malformed lines.
pub fn read_records(path: &Path) -> Result<Vec<PaperRecord>> {
    let file = File::open(path).map_err(|source| PipelineError::file(path, source))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Error processing line {}: {}", line_no + 1, e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<PaperRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Error parsing JSON line {}: {}", line_no + 1, e),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn record(name: &str, text: &str) -> PaperRecord {
        PaperRecord::new(Path::new(&format!("papers/ml/{name}")), text.to_string(), "ml".to_string())
    }

    /// Sink that refuses any non-ASCII byte.
    struct AsciiSink(Vec<u8>);

    impl Write for AsciiSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !buf.is_ascii() {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "non-ascii"));
            }
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_object_per_line() {
        let mut writer = JsonlWriter::new(Vec::new());
        assert!(writer.write_record(&record("a.pdf", "first paper")));
        assert!(writer.write_record(&record("b.pdf", "naïve “quoted” text")));

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["filename"], "b.pdf");
        assert_eq!(second["path"], "papers/ml/b.pdf");
        assert_eq!(second["category"], "ml");
        assert_eq!(second["text"], "naïve “quoted” text");
        assert!(lines[1].contains("naïve"), "non-ASCII must not be escaped");
    }

    #[test]
    fn test_failed_write_falls_back_to_ascii() {
        let mut writer = JsonlWriter::new(AsciiSink(Vec::new()));
        assert!(writer.write_record(&record("c.pdf", "résumé of results")));
        assert_eq!(writer.written(), 1);

        let output = String::from_utf8(writer.into_inner().0).unwrap();
        let parsed: PaperRecord = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(parsed.text, "rsum of results");
        assert_eq!(parsed.filename, "c.pdf");
    }

    /// Sink that accepts `accept` bytes of the first write, fails the
    /// second call, then behaves normally.
    struct PartialSink {
        data: Vec<u8>,
        calls: usize,
        accept: usize,
    }

    impl Write for PartialSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            match self.calls {
                1 => {
                    let n = self.accept.min(buf.len());
                    self.data.extend_from_slice(&buf[..n]);
                    Ok(n)
                }
                2 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "disk hiccup")),
                _ => {
                    self.data.extend_from_slice(buf);
                    Ok(buf.len())
                }
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_write_retry_starts_new_line() {
        let sink = PartialSink {
            data: Vec::new(),
            calls: 0,
            accept: 10,
        };
        let mut writer = JsonlWriter::new(sink);
        assert!(writer.write_record(&record("d.pdf", "gradient descent")));

        let output = String::from_utf8(writer.into_inner().data).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 10);
        assert!(serde_json::from_str::<PaperRecord>(lines[0]).is_err());

        let parsed: PaperRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.filename, "d.pdf");
        assert_eq!(parsed.text, "gradient descent");
    }

    #[test]
    fn test_write_then_read_skips_malformed_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("processed_pdfs.jsonl");

        let written = write_records(&path, &[record("a.pdf", "alpha"), record("b.pdf", "beta")]).unwrap();
        assert_eq!(written, 2);

        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("{not json}\n\n");
        fs::write(&path, content).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text, "beta");
    }

    #[test]
    fn test_read_missing_file_fails() {
        assert!(read_records(Path::new("/nonexistent/processed.jsonl")).is_err());
    }
}
