use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use jfrs::reader::event::Accessor;
use jfrs::reader::value_descriptor::{Primitive, ValueDescriptor};
use jfrs::reader::{Chunk, JfrReader};
use libflate::gzip::Decoder;
use log::{debug, error};

use crate::error::{Error, Result};

/// Thread state reported for samples that were actually burning CPU.
const STATE_RUNNABLE: &str = "STATE_RUNNABLE";

/// Event types the converter cares about. Everything else in a recording is
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// `jdk.ExecutionSample`: a wall-clock sample, counted as CPU as well
    /// when the sampled thread was runnable.
    Wall,
    /// `jdk.JavaMonitorEnter`: a monitor-lock wait.
    Lock,
    /// `jdk.ObjectAllocationInNewTLAB`: a fast-path object allocation.
    AllocInTlab,
    /// `jdk.ObjectAllocationOutsideTLAB`: a slow-path object allocation.
    AllocOutsideTlab,
}

impl EventKind {
    /// Classifies a JFR event type name.
    pub fn from_type_name(name: &str) -> Option<EventKind> {
        match name {
            "jdk.ExecutionSample" => Some(EventKind::Wall),
            "jdk.JavaMonitorEnter" => Some(EventKind::Lock),
            "jdk.ObjectAllocationInNewTLAB" => Some(EventKind::AllocInTlab),
            "jdk.ObjectAllocationOutsideTLAB" => Some(EventKind::AllocOutsideTlab),
            _ => None,
        }
    }
}

/// One raw call-stack frame, leaf side up, as stored in the recording.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackFrame {
    /// Declaring type in slash form (`com/foo/Bar`), when resolvable.
    pub type_name: Option<String>,
    /// Method name.
    pub method_name: String,
    /// Formal method descriptor, when the recording carries one.
    pub descriptor: Option<String>,
}

impl StackFrame {
    /// Frame with the given declaring type and method name and no descriptor.
    pub fn new(type_name: Option<&str>, method_name: &str) -> StackFrame {
        StackFrame {
            type_name: type_name.map(str::to_owned),
            method_name: method_name.to_owned(),
            descriptor: None,
        }
    }
}

/// One sampled occurrence, decoded into plain data so the rest of the
/// pipeline never touches the binary format.
#[derive(Clone, Debug)]
pub struct RecordedEvent {
    /// Which of the tracked kinds this is.
    pub kind: EventKind,
    /// Event start on the nanosecond epoch.
    pub start_nanos: i64,
    /// Java thread name, when the recording has one.
    pub thread_name: Option<String>,
    /// Call stack, leaf-first as recorded.
    pub frames: Vec<StackFrame>,
    /// Sampled thread state; only wall samples carry one.
    pub thread_state: Option<String>,
    /// Monitor or allocated object class in slash form; only lock and
    /// allocation events carry one.
    pub target_class: Option<String>,
    /// Allocated bytes; only allocation events carry one.
    pub allocation_size: Option<i64>,
}

impl RecordedEvent {
    /// Event start on the millisecond epoch used by all filtering.
    pub fn timestamp_millis(&self) -> i64 {
        self.start_nanos / 1_000_000
    }

    /// Whether the sampled thread was actually consuming CPU.
    pub fn is_consuming_cpu(&self) -> bool {
        self.thread_state.as_deref() == Some(STATE_RUNNABLE)
    }
}

/// A closed, fully-loaded recording.
///
/// `.jfr.gz` files are gunzipped transparently on open. The whole file is
/// buffered in memory; chunk parsing seeks, which gunzipped input cannot.
pub struct Recording {
    bytes: Vec<u8>,
}

impl Recording {
    /// Reads (and, for `.gz` files, decompresses) the recording at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Recording> {
        let path = path.as_ref();
        debug!("loading {}", path.display());
        let file = File::open(path)?;
        let mut bytes = Vec::new();
        if is_gzipped(path) {
            let mut decoder = Decoder::new(BufReader::new(file))?;
            decoder.read_to_end(&mut bytes)?;
        } else {
            BufReader::new(file).read_to_end(&mut bytes)?;
        }
        Ok(Recording { bytes })
    }

    /// Invokes `f` for every tracked event in the recording, in file order.
    ///
    /// Unclassified event types are skipped without cost beyond the decode;
    /// a decode failure or a callback error ends the iteration.
    pub fn for_each_event<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(RecordedEvent) -> Result<()>,
    {
        let mut reader = JfrReader::new(Cursor::new(&self.bytes[..]));
        for chunk in reader.chunks() {
            let (mut chunk_reader, chunk) =
                chunk.map_err(|e| Error::Recording(e.to_string()))?;
            for event in chunk_reader.events_from_offset(&chunk, 0) {
                let event = event.map_err(|e| Error::Recording(e.to_string()))?;
                let kind = match EventKind::from_type_name(event.class.name()) {
                    Some(kind) => kind,
                    None => continue,
                };
                f(read_event(kind, &chunk, event.value())?)?;
            }
        }
        Ok(())
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".gz"))
        .unwrap_or(false)
}

fn read_event(kind: EventKind, chunk: &Chunk, value: Accessor<'_>) -> Result<RecordedEvent> {
    let start_nanos = value
        .get_field("startTime")
        .and_then(|t| as_i64(t.value))
        .map(|ticks| ticks_to_nanos(chunk, ticks))
        .unwrap_or(0);

    let thread = value
        .get_field("sampledThread")
        .or_else(|| value.get_field("eventThread"));
    let thread_name = thread
        .and_then(|t| t.get_field("javaName"))
        .and_then(|n| as_str(n.value).map(str::to_owned));

    let thread_state = match kind {
        EventKind::Wall => value.get_field("state").and_then(thread_state_name),
        _ => None,
    };

    let target_class = match kind {
        EventKind::Lock => value.get_field("monitorClass").and_then(class_name),
        EventKind::AllocInTlab | EventKind::AllocOutsideTlab => {
            value.get_field("objectClass").and_then(class_name)
        }
        EventKind::Wall => None,
    };

    let allocation_size = match kind {
        EventKind::AllocInTlab | EventKind::AllocOutsideTlab => value
            .get_field("allocationSize")
            .and_then(|s| as_i64(s.value)),
        _ => None,
    };

    Ok(RecordedEvent {
        kind,
        start_nanos,
        thread_name,
        frames: read_stack(&value)?,
        thread_state,
        target_class,
        allocation_size,
    })
}

fn read_stack(value: &Accessor<'_>) -> Result<Vec<StackFrame>> {
    let mut frames = Vec::new();
    let trace = match value.get_field("stackTrace") {
        Some(trace) => trace,
        None => return Ok(frames),
    };
    let frame_list = match trace.get_field("frames") {
        Some(frame_list) => frame_list,
        None => return Ok(frames),
    };
    let iter = match frame_list.as_iter() {
        Some(iter) => iter,
        None => return Ok(frames),
    };
    for frame in iter {
        let method = match frame.get_field("method") {
            Some(method) => method,
            None => return Err(frame_error("stack frame without a method record")),
        };
        let method_name = match method.get_field("name").and_then(symbol_str) {
            Some(name) => name.to_owned(),
            None => return Err(frame_error("method name symbol did not resolve")),
        };
        let type_name = method
            .get_field("type")
            .and_then(|class| class.get_field("name"))
            .and_then(symbol_str)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        let descriptor = method
            .get_field("descriptor")
            .and_then(symbol_str)
            .map(str::to_owned);
        frames.push(StackFrame {
            type_name,
            method_name,
            descriptor,
        });
    }
    Ok(frames)
}

fn frame_error(msg: &str) -> Error {
    error!("{}", msg);
    Error::Frame(msg.to_owned())
}

// JFR event times are chunk-local ticks; the chunk header anchors them to
// the wall clock.
fn ticks_to_nanos(chunk: &Chunk, ticks: i64) -> i64 {
    let header = &chunk.header;
    let ticks_per_second = header.ticks_per_second as i128;
    if ticks_per_second <= 0 {
        return header.start_time_nanos as i64;
    }
    let elapsed = ticks as i128 - header.start_ticks as i128;
    header.start_time_nanos as i64 + (elapsed * 1_000_000_000 / ticks_per_second) as i64
}

// jdk.types.ThreadState is usually an object with a `name` string, but has
// also been seen inlined as a bare string in old recordings.
fn thread_state_name(state: Accessor<'_>) -> Option<String> {
    if let Some(name) = state.get_field("name") {
        return as_str(name.value).map(str::to_owned);
    }
    state.resolve().and_then(|s| as_str(s.value).map(str::to_owned))
}

fn class_name(class: Accessor<'_>) -> Option<String> {
    class
        .get_field("name")
        .and_then(symbol_str)
        .map(str::to_owned)
}

fn symbol_str(symbol: Accessor<'_>) -> Option<&str> {
    if let Some(string) = symbol.get_field("string") {
        if let Ok(value) = string.value.try_into() {
            return Some(value);
        }
    }
    None
}

fn as_str(value: &ValueDescriptor) -> Option<&str> {
    match value {
        ValueDescriptor::Primitive(Primitive::String(s)) => Some(s),
        _ => None,
    }
}

fn as_i64(value: &ValueDescriptor) -> Option<i64> {
    match value {
        ValueDescriptor::Primitive(Primitive::Long(v)) => Some(*v),
        _ => None,
    }
}
