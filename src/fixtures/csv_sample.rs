use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const ROWS: [[&str; 5]; 4] = [
    ["id", "name", "notes", "amount", "date"],
    ["1", "Alice", "He said \"hello\"", "123.45", "2025-09-22"],
    ["2", "Боб", "multi-line\nnote", "-50", "2024-01-15"],
    ["3", "李四", "emoji 😀", "0", "2023-06-30"],
];

/// UTF-8 with BOM, every field quoted, CRLF record terminators.
pub fn build() -> Result<Vec<u8>> {
    let mut buf = BOM.to_vec();
    {
        let mut w = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::CRLF)
            .from_writer(&mut buf);
        for row in ROWS {
            w.write_record(row).with_context(|| "writing CSV record")?;
        }
        w.flush().with_context(|| "flushing CSV writer")?;
    }
    Ok(buf)
}
