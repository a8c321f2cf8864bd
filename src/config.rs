use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// The importer's slice of the host bot's configuration. Any key that
/// is not listed here is ignored.
#[derive(Deserialize, Clone)]
pub struct Config
{
    /// Sent as the User-Agent header on all outbound requests.
    pub useragent: String,
}

impl Config
{
    pub fn fromFile(filename: &Path) -> Result<Self, Error>
    {
        let content = std::fs::read_to_string(filename)
            .map_err(|_| rterr!("Failed to read config file"))?;
        toml::from_str(&content)
            .map_err(|e| rterr!("Invalid config file: {}", e))
    }
}

impl Default for Config
{
    fn default() -> Self
    {
        Self { useragent: String::from("magpie/0.1") }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use anyhow::Result;

    #[test]
    fn loadConfig() -> Result<()>
    {
        let temp_dir = tempfile::tempdir()?;
        let conf_file = temp_dir.path().join("config.toml");
        std::fs::write(&conf_file, "useragent = \"test agent\"\n\
                                    upload_key = \"not ours\"\n")?;
        let conf = Config::fromFile(&conf_file)?;
        assert_eq!(conf.useragent, "test agent");
        Ok(())
    }

    #[test]
    fn missingUserAgent() -> Result<()>
    {
        let temp_dir = tempfile::tempdir()?;
        let conf_file = temp_dir.path().join("config.toml");
        std::fs::write(&conf_file, "upload_key = \"not ours\"\n")?;
        assert!(Config::fromFile(&conf_file).is_err());
        Ok(())
    }

    #[test]
    fn defaultUserAgent()
    {
        assert_eq!(Config::default().useragent, "magpie/0.1");
    }
}
