#![doc(hidden)]

use clap::Parser;

/// Command-line arguments for the `s3bench` load generator.
#[derive(Parser, Debug)]
#[command(version, about = "S3-compatible object store load generator")]
pub struct Args {
    #[clap(
        long,
        value_name = "HOST",
        help = "Comma-separated list of endpoints, each optionally using {a...b} range expansion (e.g. host{1...4}:9000)"
    )]
    pub host: String,

    #[clap(
        long = "host-select",
        value_name = "POLICY",
        help = "How to pick a host per request: roundrobin or weighed",
        default_value = "roundrobin"
    )]
    pub host_select: String,

    #[clap(
        long,
        value_name = "METHOD",
        help = "Request signing scheme: S3v2 or S3v4",
        default_value = "S3v4"
    )]
    pub signature: String,

    #[clap(long, value_name = "KEY", help = "Access key", default_value = "")]
    pub access_key: String,

    #[clap(long, value_name = "KEY", help = "Secret key", default_value = "")]
    pub secret_key: String,

    #[clap(long, value_name = "REGION", help = "Region name sent with requests", default_value = "us-east-1")]
    pub region: String,

    #[clap(long, help = "Use https instead of http", default_value_t = false)]
    pub tls: bool,

    #[clap(long, help = "Skip TLS certificate verification", default_value_t = false)]
    pub insecure: bool,

    #[clap(
        short = 'c',
        long,
        value_name = "N",
        help = "Number of concurrent worker threads",
        default_value_t = 20
    )]
    pub concurrency: usize,

    #[clap(long, value_name = "NAME", help = "Bucket to exercise", default_value = "s3bench")]
    pub bucket: String,

    #[clap(long = "obj-size", value_name = "BYTES", help = "Size of each object in bytes", default_value_t = 1024 * 1024)]
    pub obj_size: u64,

    #[clap(
        long,
        value_name = "SECONDS",
        help = "How long to run the benchmark, in seconds",
        default_value_t = 60
    )]
    pub duration: u64,

    #[clap(
        short = 'o',
        long,
        value_name = "TYPE",
        help = "Benchmark to run: put, get, delete, or mixed",
        default_value = "put"
    )]
    pub benchmark: String,

    #[clap(long, help = "Stop early once throughput has stabilized", default_value_t = false)]
    pub autoterm: bool,

    #[clap(
        long = "autoterm-dur",
        value_name = "SECONDS",
        help = "Trailing window auto-termination checks stability over",
        default_value_t = 10
    )]
    pub autoterm_dur: u64,

    #[clap(
        long = "autoterm-scale",
        value_name = "TOLERANCE",
        help = "Maximum fractional throughput variation (min/max) tolerated across the trailing window to consider the run stable",
        default_value_t = 0.05
    )]
    pub autoterm_scale: f64,

    #[clap(
        long = "skip-dur",
        value_name = "SECONDS",
        help = "Warm-up window discarded from the start of the measured range before aggregation",
        default_value_t = 0
    )]
    pub skip_dur: u64,

    #[clap(
        short = 'q',
        long,
        value_name = "PATH",
        help = "Write the JSON aggregated report to this file instead of stdout"
    )]
    pub json_output: Option<String>,

    #[clap(
        short = 'v',
        long,
        conflicts_with = "quiet",
        action = clap::ArgAction::Count,
        help = "Output details about requests and responses; specify multiple times for more detail"
    )]
    pub verbose: u8,

    #[clap(
        long,
        conflicts_with = "verbose",
        help = "Don't print any messages except for errors",
        default_value_t = false
    )]
    pub quiet: bool,
}
