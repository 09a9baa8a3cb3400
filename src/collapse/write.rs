use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{TimeZone, Utc};
use libflate::gzip::Encoder;

use super::{StackTable, Tables};
use crate::error::Result;
use crate::recording::{EventKind, RecordedEvent};

// Batch-mode output names.
const WALL_FILE: &str = "wall.collapsed";
const CPU_FILE: &str = "cpu.collapsed";
const ALLOC_COUNT_FILE: &str = "alloc.count.collapsed";
const ALLOC_SIZE_FILE: &str = "alloc.size.collapsed";
const LOCK_FILE: &str = "lock.collapsed";

/// Writes the aggregated tables out as collapsed stack files.
///
/// cpu is always written; wall is elided when it aggregated identically to
/// cpu; the allocation and lock tables only exist on disk when non-empty.
pub(crate) fn write_collapsed(outdir: &Path, tables: &mut Tables) -> io::Result<()> {
    println!("Saving to collapsed stack files...");
    if tables.wall_matches_cpu() {
        println!("Omitting wall file, has same frames as CPU");
    } else {
        save_table(outdir, WALL_FILE, &mut tables.wall)?;
    }
    save_table(outdir, CPU_FILE, &mut tables.cpu)?;
    if !tables.alloc_count.is_empty() {
        save_table(outdir, ALLOC_COUNT_FILE, &mut tables.alloc_count)?;
    }
    if !tables.alloc_size.is_empty() {
        save_table(outdir, ALLOC_SIZE_FILE, &mut tables.alloc_size)?;
    }
    if !tables.lock.is_empty() {
        save_table(outdir, LOCK_FILE, &mut tables.lock)?;
    }
    Ok(())
}

fn save_table(outdir: &Path, name: &str, table: &mut StackTable) -> io::Result<()> {
    println!(
        "Writing to dir: {} with file name: {}",
        outdir.display(),
        name
    );
    let file = File::create(outdir.join(name))?;
    let mut writer = BufWriter::new(file);
    table.write_and_clear(&mut writer)?;
    writer.flush()
}

type Sink = Encoder<BufWriter<File>>;

/// The five per-kind gzip sinks of timestamped mode.
///
/// All five are created up front, even ones that end up empty, and are
/// shared by every input file of the run.
pub(crate) struct TimestampStreams {
    wall: Sink,
    cpu: Sink,
    lock: Sink,
    alloc_count: Sink,
    alloc_size: Sink,
}

impl TimestampStreams {
    pub(crate) fn create(outdir: &Path) -> Result<TimestampStreams> {
        Ok(TimestampStreams {
            wall: open_sink(outdir, "wall.timestamps.collapsed.gz")?,
            cpu: open_sink(outdir, "cpu.timestamps.collapsed.gz")?,
            lock: open_sink(outdir, "lock.timestamps.collapsed.gz")?,
            alloc_count: open_sink(outdir, "alloc.count.timestamps.collapsed.gz")?,
            alloc_size: open_sink(outdir, "alloc.size.timestamps.collapsed.gz")?,
        })
    }

    /// Streams one event occurrence to the sinks its kind feeds.
    pub(crate) fn write_event(&mut self, event: &RecordedEvent, stack: &str) -> Result<()> {
        let ts = event.timestamp_millis();
        match event.kind {
            EventKind::Wall => {
                write_line(&mut self.wall, ts, stack, 1)?;
                if event.is_consuming_cpu() {
                    write_line(&mut self.cpu, ts, stack, 1)?;
                }
            }
            EventKind::Lock => write_line(&mut self.lock, ts, stack, 1)?,
            EventKind::AllocInTlab | EventKind::AllocOutsideTlab => {
                write_line(&mut self.alloc_count, ts, stack, 1)?;
                if let Some(size) = event.allocation_size {
                    write_line(&mut self.alloc_size, ts, stack, size)?;
                }
            }
        }
        Ok(())
    }

    /// Flushes the gzip trailers and closes all five sinks.
    pub(crate) fn finish(self) -> Result<()> {
        finish_sink(self.wall)?;
        finish_sink(self.cpu)?;
        finish_sink(self.lock)?;
        finish_sink(self.alloc_count)?;
        finish_sink(self.alloc_size)?;
        Ok(())
    }
}

fn open_sink(outdir: &Path, name: &str) -> Result<Sink> {
    let file = File::create(outdir.join(name))?;
    Ok(Encoder::new(BufWriter::new(file))?)
}

fn finish_sink(sink: Sink) -> Result<()> {
    let mut writer = sink.finish().into_result()?;
    writer.flush()?;
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, timestamp_millis: i64, stack: &str, value: i64) -> io::Result<()> {
    writeln!(
        writer,
        "{};{} {}",
        format_timestamp(timestamp_millis),
        stack,
        value
    )
}

// `yyyy-MM-dd'T'HH:mm:ss.SSS`, naive UTC. Timestamps outside chrono's
// representable range fall back to the raw millisecond count.
fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        None => millis.to_string(),
    }
}
