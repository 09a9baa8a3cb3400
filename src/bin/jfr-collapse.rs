use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, ArgGroup, Parser};
use env_logger::Env;
use jfr_collapse::collapse::{Folder, Options};

#[derive(Debug, Parser)]
#[command(
    name = "jfr-collapse",
    about = "Converts JFR recordings to collapsed stack files for flame graph tools",
    group(ArgGroup::new("input").required(true).args(["dir", "file"])),
    after_help = "\
Aggregated files (wall/cpu/lock/alloc *.collapsed) are written to the current
directory; -s writes per-event *.timestamps.collapsed.gz files instead.

An access log entry like
    [17/Sep/2020:13:03:23 +0200] [POST /app/request HTTP/1.1] [302] [- bytes] [23513 ms] [http-nio-8080-exec-250]
narrows a recording to that one slow request with:
    jfr-collapse -d . -a \"17/Sep/2020:13:03:23 +0200\" 23513 -t http-nio-8080-exec-250"
)]
struct Opt {
    // Flags...
    /// Write per-event timestamped output instead of aggregated tables
    #[arg(short = 's', long = "timestamps")]
    timestamps: bool,

    /// Apply the time window and thread filter in timestamped mode too
    #[arg(long = "filter-timestamps", requires = "timestamps")]
    filter_timestamps: bool,

    /// Silence all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Verbose logging mode (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    // Options...
    /// Scan DIR recursively for *.jfr and *.jfr.gz files and merge them all
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Convert a single recording
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Keep only the window of one logged request: its end date in
    /// "Common Log Format" and its duration in milliseconds
    #[arg(
        short = 'a',
        long = "access-log",
        num_args = 2,
        value_names = ["END_DATE", "DURATION_MS"]
    )]
    access_log: Option<Vec<String>>,

    /// Keep only events of this thread (case-insensitive)
    #[arg(short = 't', long = "thread", value_name = "NAME")]
    thread: Option<String>,

    /// Seconds to drop from the beginning of the recorded range
    #[arg(short = 'w', long = "warm-up", value_name = "SECONDS", default_value_t = 0)]
    warm_up: u64,

    /// Seconds to drop from the end of the recorded range
    #[arg(short = 'c', long = "cool-down", value_name = "SECONDS", default_value_t = 0)]
    cool_down: u64,

    /// Number of threads to use [default: number of logical cores]
    #[arg(short = 'n', long = "nthreads", value_name = "UINT")]
    nthreads: Option<usize>,
}

impl Opt {
    fn into_parts(self) -> (Option<PathBuf>, Option<PathBuf>, Options) {
        let access_log = self.access_log.map(|mut args| {
            // clap guarantees exactly two values.
            let duration = args.pop().unwrap_or_default();
            let end_date = args.pop().unwrap_or_default();
            (end_date, duration)
        });
        (
            self.dir,
            self.file,
            Options {
                thread: self.thread,
                warm_up: self.warm_up,
                cool_down: self.cool_down,
                access_log,
                timestamps: self.timestamps,
                filter_timestamps: self.filter_timestamps,
                nthreads: self.nthreads.unwrap_or_else(|| Options::default().nthreads),
                ..Options::default()
            },
        )
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    // Initialize logger
    if !opt.quiet {
        env_logger::Builder::from_env(Env::default().default_filter_or(match opt.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }))
        .format_timestamp(None)
        .init();
    }

    let outdir = env::current_dir().context("cannot resolve the working directory")?;
    let (dir, file, options) = opt.into_parts();
    let folder = Folder::from(options);
    if let Some(dir) = dir {
        folder.collapse_dir(&dir, &outdir)?;
    } else if let Some(file) = file {
        folder.collapse_file(&file, &outdir)?;
    }
    Ok(())
}
