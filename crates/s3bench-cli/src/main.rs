//! The `s3bench` binary: parse arguments, build the dispatcher and chosen
//! benchmark, run it, aggregate the resulting operation log, and print the
//! report.

pub mod args;

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info};

use args::Args;
use s3bench_aggregate::{aggregate, AggregateOptions, OperationLog};
use s3bench_bench::collector::AutoTermOptions;
use s3bench_bench::{CancelToken, Delete, Get, Mixed, Put, RunOptions};
use s3bench_dispatch::{parse_hosts, ClientPool, SelectionPolicy};
use s3bench_store::signature::{Credentials, Signer};
use s3bench_store::{HttpObjectStoreClient, ObjectStoreClient, SignatureMethod, TransportConfig};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Dispatch(#[from] s3bench_dispatch::DispatchError),

    #[error("{0}")]
    Signature(#[from] s3bench_store::signature::UnknownSignatureMethod),

    #[error("{0}")]
    Bench(#[from] s3bench_bench::BenchError),

    #[error("{0}")]
    Aggregate(#[from] s3bench_aggregate::AggregateError),

    #[error("unknown benchmark {0:?}, expected one of: put, get, delete, mixed")]
    UnknownBenchmark(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let args = Args::parse();
    enable_logging(&args);
    debug!("command line: {:?}", args);

    let cancel = CancelToken::new();
    let ctrlc_cancel = cancel.clone();
    ctrlc::set_handler(move || {
        info!("received interrupt, cancelling run");
        ctrlc_cancel.cancel();
    })
    .expect("error setting Ctrl-C handler");

    run(&args, cancel).unwrap_or_else(|e: anyhow::Error| {
        error!("{e}");
        std::process::exit(-1);
    });
}

/// Startup and run-time failures alike bubble up through `anyhow::Error`
/// here; `CliError` (and every sub-crate error it wraps) already
/// implements `std::error::Error`, so the conversion at the bottom is
/// automatic.
fn run(args: &Args, cancel: CancelToken) -> anyhow::Result<()> {
    run_inner(args, cancel).map_err(Into::into)
}

fn run_inner(args: &Args, cancel: CancelToken) -> Result<(), CliError> {
    let pool = Arc::new(build_pool(args)?);

    let mut benchmark: Box<dyn s3bench_bench::Benchmark> = match args.benchmark.to_ascii_lowercase().as_str() {
        "put" => Box::new(Put::default()),
        "get" => Box::new(Get::default()),
        "delete" => Box::new(Delete::default()),
        "mixed" => Box::new(Mixed::default()),
        other => return Err(CliError::UnknownBenchmark(other.to_string())),
    };

    let autoterm = args.autoterm.then(|| AutoTermOptions {
        method: autoterm_method(&args.benchmark),
        duration: Duration::from_secs(args.autoterm_dur),
        samples: 10,
        scale: args.autoterm_scale,
    });

    let options = RunOptions {
        concurrency: args.concurrency,
        bucket: args.bucket.clone(),
        obj_size: args.obj_size,
        duration: Duration::from_secs(args.duration),
        autoterm,
    };

    info!(
        benchmark = %args.benchmark,
        concurrency = args.concurrency,
        bucket = %args.bucket,
        "starting run"
    );
    let outcome = s3bench_bench::run(benchmark.as_mut(), pool, options, cancel)?;
    info!(operations = outcome.records.len(), "run finished, aggregating");

    let log = OperationLog::new(outcome.records);
    let report = aggregate(log, AggregateOptions::new(false, Duration::from_secs(args.skip_dur)))?;

    let json = serde_json::to_string_pretty(&report)?;
    match &args.json_output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{json}")?;
        }
    }

    Ok(())
}

fn build_pool(args: &Args) -> Result<ClientPool, CliError> {
    let hosts = parse_hosts(&args.host)?;
    let policy = SelectionPolicy::from_str(&args.host_select)?;
    let signature = SignatureMethod::from_str(&args.signature)?;

    let credentials = Credentials {
        access_key: args.access_key.clone(),
        secret_key: args.secret_key.clone(),
        region: args.region.clone(),
    };
    let transport = TransportConfig::new(args.concurrency).insecure_skip_verify(args.insecure);

    let clients: Vec<Arc<dyn ObjectStoreClient>> = hosts
        .into_iter()
        .map(|endpoint| {
            let signer = Signer::new(signature, credentials.clone());
            Arc::new(HttpObjectStoreClient::new(endpoint, args.tls, &transport, signer)) as Arc<dyn ObjectStoreClient>
        })
        .collect();

    Ok(ClientPool::new(clients, policy)?)
}

/// The operation type auto-termination watches: the sole type for
/// `put`/`get`/`delete`, and `PUT` for `mixed` since it's the first kind
/// `Mixed` assigns workers to (§5's "mixed runs pick the operation that
/// dominates the workload" — PUT is as good a default as any single type
/// without deeper per-run dominance tracking).
fn autoterm_method(benchmark: &str) -> &'static str {
    match benchmark.to_ascii_lowercase().as_str() {
        "get" => "GET",
        "delete" => "DELETE",
        _ => "PUT",
    }
}

fn enable_logging(args: &Args) {
    let mut builder = tracing_subscriber::fmt().compact();

    if args.quiet {
        builder = builder.with_max_level(tracing::Level::ERROR);
    } else {
        match args.verbose {
            2.. => builder = builder.with_max_level(tracing::Level::TRACE),
            1 => builder = builder.with_max_level(tracing::Level::DEBUG),
            _ => builder = builder.with_max_level(tracing::Level::INFO),
        }
    }

    builder.init();
}
