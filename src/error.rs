#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("slot map is full")]
    Full,
    #[error("invalid index {0}")]
    InvalidIndex(u32),

    #[error("wrong generation for index {0}")]
    WrongGeneration(u32),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
