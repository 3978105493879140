use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Cannot compile item set index: {0}")]
    Regex(#[from] regex::Error),

    #[error("Cannot list item set identifiers: {0}")]
    Resolver(#[from] cleanurl_core::Error),
}
