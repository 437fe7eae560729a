#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    #[error("cannot aggregate an empty operation log")]
    EmptyLog,
}
