use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A structural tree mutation that would corrupt the parent/child
    /// invariant - attaching into a missing or cyclic location, or detaching
    /// a widget that isn't a child of the claimed parent.
    #[error("tree")]
    Tree(String),
    #[error("focus")]
    Focus(String),
    #[error("geometry")]
    Geometry(String),
    #[error("render")]
    Render(String),
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Error::Render(format!("lock poisoned: {e}"))
    }
}
