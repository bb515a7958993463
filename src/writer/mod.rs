use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const WRITER_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming sink for a fenced diagram document.
///
/// Table blocks are flushed as soon as they are complete; `finish` writes the
/// closing fence and hands back the inner sink.
pub struct DiagramWriter<W: Write> {
    writer: W,
    blocks_written: usize,
    lines_written: usize,
}

impl DiagramWriter<BufWriter<File>> {
    /// Open `path` for a fresh diagram, replacing any previous file.
    ///
    /// Failure to remove the previous file is ignored; the parent directory is
    /// created when missing.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let _ = fs::remove_file(path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        Ok(Self::new(BufWriter::with_capacity(WRITER_BUFFER_SIZE, file)))
    }
}

impl<W: Write> DiagramWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            blocks_written: 0,
            lines_written: 0,
        }
    }

    /// Opening fence, front matter and diagram kind, followed by a blank line
    pub fn write_header(&mut self, fence: &str, layout: &str) -> std::io::Result<()> {
        for line in [
            format!("```{}", fence),
            "---".to_string(),
            "config:".to_string(),
            format!("  layout: {}", layout),
            "---".to_string(),
            "erDiagram".to_string(),
            String::new(),
        ] {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Write one complete entity block and flush it
    pub fn write_table_block(&mut self, block: &str) -> std::io::Result<()> {
        self.writer.write_all(block.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.blocks_written += 1;
        self.writer.flush()
    }

    pub fn write_relationship(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Close the fence and flush, returning the underlying sink
    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.write_all(b"```")?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
