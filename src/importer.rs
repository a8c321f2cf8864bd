use std::fmt;

use crate::error::Error;

/// What the mirroring pipeline needs to know about a resolved
/// submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult
{
    /// An anonymized label standing in for the image's author.
    pub author: String,
    /// The submission URL, with HTML entities decoded.
    pub source: String,
    /// Human-readable provenance text. May embed an uploader name.
    pub display_header: String,
    /// Where the image can be directly downloaded. Always exactly one
    /// entry.
    pub image_urls: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ImportError
{
    /// The URL does not belong to the site this importer handles.
    /// This is not a real error; the caller should move on to some
    /// other importer, or skip the submission.
    Unrecognized,
    /// The importer recognized the URL but could not resolve it. The
    /// caller is expected to log this; nothing is shown to the end
    /// user.
    Failed
    {
        url: String,
        cause: Error,
    },
}

impl fmt::Display for ImportError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            ImportError::Unrecognized => write!(f, "URL not recognized"),
            ImportError::Failed { url, cause } =>
                write!(f, "Could not import URL {} ({})", url, cause),
        }
    }
}

impl std::error::Error for ImportError {}

/// An Importer figures out the direct image location from the
/// origianl submission URL, along with the attribution metadata the
/// mirroring pipeline displays next to the mirror. An Importer does
/// not upload anything, and it does not decide what happens to a
/// submission it cannot handle.
pub trait Importer
{
    fn import(&self, url: &str) -> Result<ImportResult, ImportError>;
}
