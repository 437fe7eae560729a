#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("dispatch setup failed: {0}")]
    Dispatch(#[from] s3bench_dispatch::DispatchError),

    #[error("store operation failed during setup: {0}")]
    Store(#[from] s3bench_store::StoreError),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("duration must be greater than zero")]
    ZeroDuration,
}
