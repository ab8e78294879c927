//! JSON writers for font records
//!
//! [`write_ndjson`] pulls records one at a time, so a listing fed straight
//! from a [`SystemFontIterator`](crate::SystemFontIterator) starts printing
//! before the configuration has been walked to the end. [`write_json_pretty`]
//! has to see every record before it can close the array.

use std::io::Write;

use anyhow::Result;

use crate::record::FontRecord;

/// Write records as one prettified JSON array. Returns how many were written.
pub fn write_json_pretty<I>(records: I, mut w: impl Write) -> Result<usize>
where
    I: IntoIterator<Item = FontRecord>,
{
    let records: Vec<FontRecord> = records.into_iter().collect();
    serde_json::to_writer_pretty(&mut w, &records)?;
    w.write_all(b"\n")?;
    Ok(records.len())
}

/// Write each record on its own line as soon as it is produced.
///
/// Stops at the first write error without pulling further records.
pub fn write_ndjson<I>(records: I, mut w: impl Write) -> Result<usize>
where
    I: IntoIterator<Item = FontRecord>,
{
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut w, &record)?;
        w.write_all(b"\n")?;
        written += 1;
    }
    w.flush()?;
    Ok(written)
}
