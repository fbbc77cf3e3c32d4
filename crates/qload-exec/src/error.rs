use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("unsupported kind for this runner: {0}")]
    UnsupportedKind(&'static str),
}
