//! jfr-collapse converts [JFR] recordings, as produced by [async-profiler]
//! or the JVM's own flight recorder, into the collapsed ("folded") stack
//! format consumed by flame graph tools like [inferno] and Brendan Gregg's
//! original [FlameGraph] scripts.
//!
//! A recording carries several kinds of sampled events, and each kind becomes
//! its own collapsed file: wall-clock execution samples (`wall.collapsed`),
//! the subset of those whose thread was actually runnable (`cpu.collapsed`),
//! monitor-lock waits (`lock.collapsed`), and object allocations counted by
//! occurrence and by byte (`alloc.count.collapsed`, `alloc.size.collapsed`).
//! Every line is a `;`-joined root-first frame path prefixed with the thread
//! name, followed by a count or byte sum.
//!
//! # Command-line use
//!
//! ```console
//! $ jfr-collapse -f recording.jfr
//! $ jfr-collapse -d ./recordings        # merge every *.jfr / *.jfr.gz found
//! $ cat wall.collapsed | inferno-flamegraph > wall.svg
//! ```
//!
//! Recordings taken around a slow request can be narrowed to just that
//! request using its access-log line (end date plus duration) and thread:
//!
//! ```console
//! $ jfr-collapse -d . -a "17/Sep/2020:13:03:23 +0200" 23513 -t http-nio-8080-exec-250
//! ```
//!
//! Startup and shutdown noise can be trimmed with `-w`/`-c` (warm-up and
//! cool-down seconds), and `-s` switches to a one-pass mode that streams
//! every event occurrence with its timestamp into per-kind gzip files
//! instead of aggregating.
//!
//! # Programmatic access
//!
//! ```no_run
//! use jfr_collapse::collapse::{Folder, Options};
//!
//! let folder = Folder::from(Options::default());
//! folder.collapse_file("recording.jfr", ".")?;
//! # Ok::<(), jfr_collapse::Error>(())
//! ```
//!
//!   [JFR]: https://openjdk.org/jeps/328
//!   [async-profiler]: https://github.com/async-profiler/async-profiler
//!   [inferno]: https://github.com/jonhoo/inferno
//!   [FlameGraph]: https://github.com/brendangregg/FlameGraph

#![deny(missing_docs)]

/// Event classification, filtering, flattening and aggregation.
///
/// See the [crate-level documentation] for details.
///
///   [crate-level documentation]: ../index.html
pub mod collapse;

/// Reading recordings: a thin facade over the `jfrs` JFR parser.
///
/// See the [crate-level documentation] for details.
///
///   [crate-level documentation]: ../index.html
pub mod recording;

mod error;

pub use error::{Error, Result};
