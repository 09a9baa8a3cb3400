/// Time and thread scoping of individual events.
pub mod filter;

/// Frame formatting and stack flattening.
pub mod frame;

/// Resolution of the optional time window.
pub mod window;

mod write;

use std::io;
#[cfg(feature = "multithreaded")]
use std::mem;
use std::path::{Path, PathBuf};
#[cfg(feature = "multithreaded")]
use std::sync::Arc;

use ahash::AHashMap;
#[cfg(feature = "multithreaded")]
use dashmap::DashMap;
use log::error;
#[cfg(feature = "multithreaded")]
use once_cell::sync::Lazy;
use walkdir::WalkDir;

use crate::error::Result;
use crate::recording::{EventKind, RecordedEvent, Recording};
use filter::EventFilter;
use frame::{flatten_stack, FrameRules};
use window::TimeWindow;
use write::TimestampStreams;

const CAPACITY_HASHMAP: usize = 512;

/// Default worker count for batch directory mode.
#[cfg(feature = "multithreaded")]
pub static DEFAULT_NTHREADS: Lazy<usize> = Lazy::new(num_cpus::get);

// Frame annotations understood by flame graph renderers. Locks and
// slow-path allocations carry the inlined marker, fast-path allocations
// the kernel marker.
const INLINED_ANNOTATION: &str = "_[i]";
const KERNEL_ANNOTATION: &str = "_[k]";

/// Settings that change how recordings are converted.
#[derive(Clone, Debug)]
pub struct Options {
    /// Restrict output to one thread, matched case-insensitively.
    pub thread: Option<String>,

    /// Seconds trimmed from the start of the observed time range.
    pub warm_up: u64,

    /// Seconds trimmed from the end of the observed time range.
    pub cool_down: u64,

    /// Access-log end date (`dd/MMM/yyyy:HH:mm:ss Z`) and request duration
    /// in milliseconds. Takes precedence over warm-up/cool-down trimming.
    pub access_log: Option<(String, String)>,

    /// Stream every event occurrence with its timestamp into per-kind gzip
    /// files instead of aggregating.
    pub timestamps: bool,

    /// Apply the time window and thread filter to timestamped output too.
    /// Off by default: timestamped output historically carried every event.
    pub filter_timestamps: bool,

    /// Descriptor-driven frame rewrite rules.
    pub frame_rules: FrameRules,

    /// Number of worker threads for batch directory mode.
    pub nthreads: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            thread: None,
            warm_up: 0,
            cool_down: 0,
            access_log: None,
            timestamps: false,
            filter_timestamps: false,
            frame_rules: FrameRules::default(),
            nthreads: default_nthreads(),
        }
    }
}

#[cfg(feature = "multithreaded")]
fn default_nthreads() -> usize {
    *DEFAULT_NTHREADS
}

#[cfg(not(feature = "multithreaded"))]
fn default_nthreads() -> usize {
    1
}

/// One collapsed-stack aggregation table: stack path to accumulated value.
///
/// Uses a plain `ahash` map when a single thread owns it, and a shared
/// `dashmap` when file-processing workers write concurrently.
#[derive(Clone, Debug)]
pub enum StackTable {
    /// Map owned by one thread.
    SingleThreaded(AHashMap<String, i64>),
    /// Map shared by file-processing workers.
    #[cfg(feature = "multithreaded")]
    MultiThreaded(Arc<DashMap<String, i64, ahash::RandomState>>),
}

impl StackTable {
    pub(crate) fn new(nthreads: usize) -> Self {
        assert_ne!(nthreads, 0);
        #[cfg(feature = "multithreaded")]
        if nthreads > 1 {
            let map = DashMap::with_capacity_and_hasher(CAPACITY_HASHMAP, ahash::RandomState::new());
            return StackTable::MultiThreaded(Arc::new(map));
        }
        StackTable::SingleThreaded(AHashMap::with_capacity(CAPACITY_HASHMAP))
    }

    /// Adds `delta` to the accumulator for `stack`, starting from zero for
    /// stacks not seen before.
    pub fn add(&mut self, stack: String, delta: i64) {
        match self {
            StackTable::SingleThreaded(map) => *map.entry(stack).or_insert(0) += delta,
            #[cfg(feature = "multithreaded")]
            StackTable::MultiThreaded(map) => *map.entry(stack).or_insert(0) += delta,
        }
    }

    /// Number of distinct stack paths recorded.
    pub fn len(&self) -> usize {
        match self {
            StackTable::SingleThreaded(map) => map.len(),
            #[cfg(feature = "multithreaded")]
            StackTable::MultiThreaded(map) => map.len(),
        }
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all accumulators.
    pub fn total(&self) -> i64 {
        match self {
            StackTable::SingleThreaded(map) => map.values().sum(),
            #[cfg(feature = "multithreaded")]
            StackTable::MultiThreaded(map) => map.iter().map(|entry| *entry.value()).sum(),
        }
    }

    #[cfg(feature = "multithreaded")]
    fn is_concurrent(&self) -> bool {
        match self {
            StackTable::SingleThreaded(_) => false,
            StackTable::MultiThreaded(_) => true,
        }
    }

    // Drains the table as `"<stack> <value>"` lines, sorted so the same
    // table always serializes to the same bytes.
    pub(crate) fn write_and_clear<W: io::Write>(&mut self, mut writer: W) -> io::Result<()> {
        let mut contents: Vec<(String, i64)> = match self {
            StackTable::SingleThreaded(map) => map.drain().collect(),
            #[cfg(feature = "multithreaded")]
            StackTable::MultiThreaded(arc) => {
                let map = match Arc::get_mut(arc) {
                    Some(map) => map,
                    None => panic!(
                        "draining a concurrent table while workers still hold it, \
                         which is not allowed"
                    ),
                };
                let map = mem::replace(
                    map,
                    DashMap::with_capacity_and_hasher(CAPACITY_HASHMAP, ahash::RandomState::new()),
                );
                map.into_iter().collect()
            }
        };
        contents.sort();
        for (stack, value) in contents {
            writeln!(writer, "{} {}", stack, value)?;
        }
        Ok(())
    }
}

/// The five aggregation tables of one conversion run.
///
/// Owning them in one value (instead of process-wide state) keeps runs and
/// tests independent; clones share the underlying maps in concurrent mode.
#[derive(Clone, Debug)]
pub struct Tables {
    /// Every wall-clock sample.
    pub wall: StackTable,
    /// Wall-clock samples whose thread was runnable.
    pub cpu: StackTable,
    /// Allocation events by occurrence.
    pub alloc_count: StackTable,
    /// Allocation events by byte size.
    pub alloc_size: StackTable,
    /// Monitor-lock waits.
    pub lock: StackTable,
}

impl Tables {
    /// Creates empty tables sized for `nthreads` concurrent writers.
    pub fn new(nthreads: usize) -> Tables {
        Tables {
            wall: StackTable::new(nthreads),
            cpu: StackTable::new(nthreads),
            alloc_count: StackTable::new(nthreads),
            alloc_size: StackTable::new(nthreads),
            lock: StackTable::new(nthreads),
        }
    }

    /// Whether wall and cpu aggregated identically (every wall sample was
    /// runnable), making the wall table redundant on disk.
    pub fn wall_matches_cpu(&self) -> bool {
        self.wall.len() == self.cpu.len() && self.wall.total() == self.cpu.total()
    }
}

/// Converts JFR recordings into collapsed stack files.
///
/// To construct one, either use `Folder::default()` or create an [`Options`]
/// and use `Folder::from(options)`.
#[derive(Clone, Debug, Default)]
pub struct Folder {
    opt: Options,
}

impl From<Options> for Folder {
    fn from(opt: Options) -> Self {
        Folder { opt }
    }
}

impl Folder {
    /// Recursively scans `dir` for `.jfr`/`.jfr.gz` recordings and merges
    /// them all into one set of output files under `outdir`.
    pub fn collapse_dir<P, Q>(&self, dir: P, outdir: Q) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let paths = find_recordings(dir.as_ref())?;
        self.collapse_paths(&paths, outdir.as_ref())
    }

    /// Converts a single recording into output files under `outdir`.
    pub fn collapse_file<P, Q>(&self, file: P, outdir: Q) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.collapse_paths(&[file.as_ref().to_path_buf()], outdir.as_ref())
    }

    /// Converts `paths`, merging every recording into one set of output
    /// files under `outdir`.
    ///
    /// Window resolution errors are fatal; a recording that fails to parse
    /// is logged and skipped so one bad file cannot sink a directory run.
    pub fn collapse_paths(&self, paths: &[PathBuf], outdir: &Path) -> Result<()> {
        let window = self.resolve_window(paths)?;
        let filter = EventFilter::new(window, self.opt.thread.as_deref());
        if self.opt.timestamps {
            self.stream_paths(paths, outdir, &filter)?;
        } else {
            self.aggregate_paths(paths, outdir, &filter)?;
        }
        println!("Done");
        Ok(())
    }

    fn resolve_window(&self, paths: &[PathBuf]) -> Result<Option<TimeWindow>> {
        if let Some((end_date, duration_millis)) = &self.opt.access_log {
            return window::from_access_log(end_date, duration_millis).map(Some);
        }
        if self.opt.warm_up == 0 && self.opt.cool_down == 0 {
            return Ok(None);
        }
        // Trimming is relative to the recorded extremes, so this costs an
        // extra pass over every input before conversion starts.
        let range = self.observed_range(paths);
        Ok(range
            .map(|(min, max)| window::trimmed(min, max, self.opt.warm_up, self.opt.cool_down)))
    }

    fn observed_range(&self, paths: &[PathBuf]) -> Option<(i64, i64)> {
        let mut range: Option<(i64, i64)> = None;
        for path in paths {
            let scanned = Recording::open(path).and_then(|recording| {
                recording.for_each_event(|event| {
                    let ts = event.timestamp_millis();
                    range = Some(match range {
                        Some((min, max)) => (min.min(ts), max.max(ts)),
                        None => (ts, ts),
                    });
                    Ok(())
                })
            });
            if let Err(e) = scanned {
                error!("skipping {} while scanning the time range: {}", path.display(), e);
            }
        }
        range
    }

    fn aggregate_paths(&self, paths: &[PathBuf], outdir: &Path, filter: &EventFilter) -> Result<()> {
        let nthreads = self.opt.nthreads.clamp(1, paths.len().max(1));
        let mut tables = Tables::new(nthreads);

        #[cfg(feature = "multithreaded")]
        {
            if tables.wall.is_concurrent() {
                self.aggregate_parallel(paths, filter, &tables, nthreads);
            } else {
                self.aggregate_serial(paths, filter, &mut tables);
            }
        }
        #[cfg(not(feature = "multithreaded"))]
        self.aggregate_serial(paths, filter, &mut tables);

        write::write_collapsed(outdir, &mut tables)?;
        Ok(())
    }

    fn aggregate_serial(&self, paths: &[PathBuf], filter: &EventFilter, tables: &mut Tables) {
        for path in paths {
            if let Err(e) = self.aggregate_one(path, filter, tables) {
                error!("skipping {}: {}", path.display(), e);
            }
        }
    }

    #[cfg(feature = "multithreaded")]
    fn aggregate_parallel(
        &self,
        paths: &[PathBuf],
        filter: &EventFilter,
        tables: &Tables,
        nthreads: usize,
    ) {
        let (tx, rx) = crossbeam_channel::bounded::<PathBuf>(paths.len());
        crossbeam_utils::thread::scope(|scope| {
            for _ in 0..nthreads {
                let rx = rx.clone();
                let mut tables = tables.clone();
                scope.spawn(move |_| {
                    while let Ok(path) = rx.recv() {
                        if let Err(e) = self.aggregate_one(&path, filter, &mut tables) {
                            error!("skipping {}: {}", path.display(), e);
                        }
                    }
                });
            }
            drop(rx);
            for path in paths {
                if tx.send(path.clone()).is_err() {
                    break;
                }
            }
            drop(tx);
        })
        .unwrap();
    }

    fn aggregate_one(&self, path: &Path, filter: &EventFilter, tables: &mut Tables) -> Result<()> {
        announce(path);
        let recording = Recording::open(path)?;
        recording.for_each_event(|event| {
            self.record_event(&event, filter, tables);
            Ok(())
        })
    }

    // The batch-mode routing core: filter, flatten, and count one event.
    fn record_event(&self, event: &RecordedEvent, filter: &EventFilter, tables: &mut Tables) {
        if filter.should_skip(event.timestamp_millis(), event.thread_name.as_deref()) {
            return;
        }
        if event.frames.is_empty() {
            return;
        }
        let stack = self.event_stack(event);
        match event.kind {
            EventKind::Wall => {
                if event.is_consuming_cpu() {
                    tables.cpu.add(stack.clone(), 1);
                }
                tables.wall.add(stack, 1);
            }
            EventKind::Lock => tables.lock.add(stack, 1),
            EventKind::AllocInTlab | EventKind::AllocOutsideTlab => {
                if let Some(size) = event.allocation_size {
                    tables.alloc_size.add(stack.clone(), size);
                }
                tables.alloc_count.add(stack, 1);
            }
        }
    }

    // Collapsed path for one event, including the synthetic trailing class
    // segment of lock and allocation events.
    fn event_stack(&self, event: &RecordedEvent) -> String {
        let stack = flatten_stack(
            event.thread_name.as_deref(),
            &event.frames,
            &self.opt.frame_rules,
        );
        match event.kind {
            EventKind::Wall => stack,
            EventKind::Lock | EventKind::AllocOutsideTlab => {
                annotate(stack, event.target_class.as_deref(), INLINED_ANNOTATION)
            }
            EventKind::AllocInTlab => {
                annotate(stack, event.target_class.as_deref(), KERNEL_ANNOTATION)
            }
        }
    }

    fn stream_paths(&self, paths: &[PathBuf], outdir: &Path, filter: &EventFilter) -> Result<()> {
        let mut streams = TimestampStreams::create(outdir)?;
        for path in paths {
            if let Err(e) = self.stream_one(path, filter, &mut streams) {
                error!("skipping {}: {}", path.display(), e);
            }
        }
        streams.finish()
    }

    fn stream_one(
        &self,
        path: &Path,
        filter: &EventFilter,
        streams: &mut TimestampStreams,
    ) -> Result<()> {
        announce(path);
        let recording = Recording::open(path)?;
        recording.for_each_event(|event| {
            if self.opt.filter_timestamps
                && filter.should_skip(event.timestamp_millis(), event.thread_name.as_deref())
            {
                return Ok(());
            }
            if event.frames.is_empty() {
                return Ok(());
            }
            let stack = self.event_stack(&event);
            streams.write_event(&event, &stack)
        })
    }
}

// A missing class drops only the synthetic segment, never the event.
fn annotate(mut stack: String, class: Option<&str>, annotation: &str) -> String {
    if let Some(class) = class {
        stack.push(';');
        stack.push_str(class);
        stack.push_str(annotation);
    }
    stack
}

fn announce(path: &Path) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    println!("Input file: {}", name);
    println!("Converting JFR to collapsed stack ...");
}

/// Recursively finds `.jfr` and `.jfr.gz` recordings under `dir`, matching
/// extensions case-insensitively. The result is sorted so directory runs
/// are reproducible.
pub fn find_recordings(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(".jfr") || name.ends_with(".jfr.gz") {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::recording::StackFrame;

    fn frames() -> Vec<StackFrame> {
        vec![
            StackFrame::new(Some("com/foo/Leaf"), "tip"),
            StackFrame::new(Some("com/foo/Mid"), "call"),
            StackFrame::new(Some("com/foo/Root"), "main"),
        ]
    }

    fn event(kind: EventKind, ts_millis: i64, thread: &str) -> RecordedEvent {
        RecordedEvent {
            kind,
            start_nanos: ts_millis * 1_000_000,
            thread_name: Some(thread.to_owned()),
            frames: frames(),
            thread_state: None,
            target_class: None,
            allocation_size: None,
        }
    }

    fn wall(ts_millis: i64, thread: &str, state: &str) -> RecordedEvent {
        RecordedEvent {
            thread_state: Some(state.to_owned()),
            ..event(EventKind::Wall, ts_millis, thread)
        }
    }

    fn entries(table: &StackTable) -> Vec<(String, i64)> {
        let mut entries: Vec<(String, i64)> = match table {
            StackTable::SingleThreaded(map) => {
                map.iter().map(|(k, v)| (k.clone(), *v)).collect()
            }
            #[cfg(feature = "multithreaded")]
            StackTable::MultiThreaded(map) => map
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        };
        entries.sort();
        entries
    }

    fn record_all(folder: &Folder, filter: &EventFilter, events: &[RecordedEvent]) -> Tables {
        let mut tables = Tables::new(1);
        for event in events {
            folder.record_event(event, filter, &mut tables);
        }
        tables
    }

    const ROOT_FIRST: &str = "main;com/foo/Root.main;com/foo/Mid.call;com/foo/Leaf.tip";

    #[test]
    fn wall_samples_aggregate_root_first() {
        let folder = Folder::default();
        let tables = record_all(
            &folder,
            &EventFilter::default(),
            &[
                wall(0, "main", "STATE_RUNNABLE"),
                wall(1, "main", "STATE_RUNNABLE"),
            ],
        );
        assert_eq!(entries(&tables.wall), vec![(ROOT_FIRST.to_owned(), 2)]);
        assert_eq!(entries(&tables.cpu), vec![(ROOT_FIRST.to_owned(), 2)]);
    }

    #[test]
    fn only_runnable_samples_reach_the_cpu_table() {
        let folder = Folder::default();
        let tables = record_all(
            &folder,
            &EventFilter::default(),
            &[
                wall(0, "main", "STATE_RUNNABLE"),
                wall(1, "main", "STATE_SLEEPING"),
                wall(2, "main", "STATE_RUNNABLE"),
            ],
        );
        assert_eq!(tables.wall.total(), 3);
        assert_eq!(tables.cpu.total(), 2);
        assert!(!tables.wall_matches_cpu());
    }

    #[test]
    fn all_runnable_input_makes_wall_redundant() {
        let folder = Folder::default();
        let tables = record_all(
            &folder,
            &EventFilter::default(),
            &[
                wall(0, "main", "STATE_RUNNABLE"),
                wall(1, "main", "STATE_RUNNABLE"),
            ],
        );
        assert!(tables.wall_matches_cpu());
    }

    #[test]
    fn aggregation_is_idempotent_across_runs() {
        let folder = Folder::default();
        let events = vec![
            wall(0, "main", "STATE_RUNNABLE"),
            wall(1, "worker", "STATE_SLEEPING"),
            event(EventKind::Lock, 2, "main"),
        ];
        let first = record_all(&folder, &EventFilter::default(), &events);
        let second = record_all(&folder, &EventFilter::default(), &events);
        assert_eq!(entries(&first.wall), entries(&second.wall));
        assert_eq!(entries(&first.cpu), entries(&second.cpu));
        assert_eq!(entries(&first.lock), entries(&second.lock));
    }

    #[test]
    fn lock_events_get_the_monitor_class_segment() {
        let folder = Folder::default();
        let mut lock = event(EventKind::Lock, 0, "main");
        lock.target_class = Some("com/foo/Lock".to_owned());
        let tables = record_all(&folder, &EventFilter::default(), &[lock]);
        let (stack, count) = &entries(&tables.lock)[0];
        assert!(stack.ends_with(";com/foo/Lock_[i]"), "got {}", stack);
        assert_eq!(*count, 1);
    }

    #[test]
    fn allocations_split_by_tlab_suffix() {
        let folder = Folder::default();
        let mut fast = event(EventKind::AllocInTlab, 0, "main");
        fast.target_class = Some("com/foo/Bar".to_owned());
        fast.allocation_size = Some(24);
        let mut slow = event(EventKind::AllocOutsideTlab, 1, "main");
        slow.target_class = Some("com/foo/Bar".to_owned());
        slow.allocation_size = Some(1 << 20);

        let tables = record_all(&folder, &EventFilter::default(), &[fast, slow]);
        let count_entries = entries(&tables.alloc_count);
        assert!(count_entries[0].0.ends_with(";com/foo/Bar_[i]"));
        assert!(count_entries[1].0.ends_with(";com/foo/Bar_[k]"));
        assert_eq!(tables.alloc_count.total(), 2);
        assert_eq!(tables.alloc_size.total(), 24 + (1 << 20));
    }

    #[test]
    fn sizeless_allocations_are_still_counted() {
        let folder = Folder::default();
        let mut alloc = event(EventKind::AllocInTlab, 0, "main");
        alloc.target_class = Some("com/foo/Bar".to_owned());
        let tables = record_all(&folder, &EventFilter::default(), &[alloc]);
        assert_eq!(tables.alloc_count.total(), 1);
        assert!(tables.alloc_size.is_empty());
    }

    #[test]
    fn classless_events_keep_the_bare_stack() {
        let folder = Folder::default();
        let tables = record_all(
            &folder,
            &EventFilter::default(),
            &[event(EventKind::Lock, 0, "main")],
        );
        assert_eq!(entries(&tables.lock), vec![(ROOT_FIRST.to_owned(), 1)]);
    }

    #[test]
    fn stackless_events_are_dropped() {
        let folder = Folder::default();
        let mut stackless = wall(0, "main", "STATE_RUNNABLE");
        stackless.frames.clear();
        let tables = record_all(&folder, &EventFilter::default(), &[stackless]);
        assert!(tables.wall.is_empty());
        assert!(tables.cpu.is_empty());
    }

    #[test]
    fn the_window_drops_out_of_range_events() {
        let folder = Folder::default();
        let window = window::trimmed(0, 3_000, 1, 1);
        let filter = EventFilter::new(Some(window), None);
        let tables = record_all(
            &folder,
            &filter,
            &[
                wall(0, "main", "STATE_RUNNABLE"),
                wall(1_000, "main", "STATE_RUNNABLE"),
                wall(2_000, "main", "STATE_RUNNABLE"),
                wall(3_000, "main", "STATE_RUNNABLE"),
            ],
        );
        assert_eq!(tables.wall.total(), 2);
    }

    #[test]
    fn the_thread_filter_is_case_insensitive() {
        let folder = Folder::default();
        let filter = EventFilter::new(None, Some("Worker-1"));
        let tables = record_all(
            &folder,
            &filter,
            &[
                wall(0, "worker-1", "STATE_RUNNABLE"),
                wall(1, "worker-2", "STATE_RUNNABLE"),
            ],
        );
        assert_eq!(tables.wall.total(), 1);
        let (stack, _) = &entries(&tables.wall)[0];
        assert!(stack.starts_with("worker-1;"));
    }

    #[cfg(feature = "multithreaded")]
    #[test]
    fn concurrent_tables_aggregate_like_plain_ones() {
        let folder = Folder::default();
        let events: Vec<RecordedEvent> = (0..100)
            .map(|i| wall(i, "main", "STATE_RUNNABLE"))
            .collect();

        let plain = record_all(&folder, &EventFilter::default(), &events);

        let shared = Tables::new(4);
        assert!(shared.wall.is_concurrent());
        crossbeam_utils::thread::scope(|scope| {
            for half in events.chunks(50) {
                let mut tables = shared.clone();
                let folder = &folder;
                scope.spawn(move |_| {
                    let filter = EventFilter::default();
                    for event in half {
                        folder.record_event(event, &filter, &mut tables);
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(entries(&plain.wall), entries(&shared.wall));
        assert_eq!(entries(&plain.cpu), entries(&shared.cpu));
    }

    #[test]
    fn recording_scan_matches_jfr_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        for name in ["one.jfr", "two.JFR.GZ", "skip.txt", "notes.jfr.bak"] {
            std::fs::write(nested.join(name), b"").unwrap();
        }
        let found = find_recordings(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["one.jfr", "two.JFR.GZ"]);
    }
}
