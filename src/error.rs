use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{
    RuntimeError(String),
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            Error::RuntimeError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Construct a `RuntimeError` from a format string.
macro_rules! rterr
{
    ($($arg:expr),+) => {
        crate::error::Error::RuntimeError(format!($($arg),+))
    };
}
