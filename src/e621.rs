use ureq;
use serde_json;
use regex::Regex;
use serde::Deserialize;
use log::{info, debug};

use crate::config::Config;
use crate::error::Error;
use crate::importer;
use crate::importer::{ImportError, ImportResult};

/// Recognizes e621/e926 URLs, both CDN assets
/// (`https://static1.e621.net/data/…`) and post pages
/// (`https://e621.net/post/show/1234/…`). The numeric post ID is
/// captured when the URL has one.
static URL_PATTERN: &str = r"^https?://(?:www\.)?(?:static1\.)?(?:e621|e926)\.net/(?:data/.+/(?P<cdn_id>\w+))?(?:post/show/(?P<id>\d+)/?)?.*$";
static API_ENDPOINT: &str = "http://e926.net/post/show.json";
static UA_HEADER_KEY: &str = "User-Agent";

static AUTHOR_DIRECT: &str = "a e926 user";
static AUTHOR_LOOKUP: &str = "an e926 user";
static HEADER_DIRECT: &str = "Mirrored e926 image:\n\n";

fn decodeEntity(body: &str) -> Option<char>
{
    match body
    {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ =>
        {
            let code = if let Some(hex) = body.strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            }
            else if let Some(dec) = body.strip_prefix('#')
            {
                dec.parse().ok()
            }
            else
            {
                None
            };
            code.and_then(char::from_u32)
        },
    }
}

/// Decode HTML character entities, e.g. “&amp;” → “&”. Submission
/// URLs arrive with entities intact, so this has to happen before any
/// pattern match. Anything that does not look like an entity is left
/// alone.
fn unescapeHtml(s: &str) -> String
{
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(begin) = rest.find('&')
    {
        result.push_str(&rest[..begin]);
        rest = &rest[begin..];
        let decoded = rest.find(';').and_then(
            |end| decodeEntity(&rest[1..end]).map(|c| (c, end)));
        if let Some((c, end)) = decoded
        {
            result.push(c);
            rest = &rest[end + 1..];
        }
        else
        {
            result.push('&');
            rest = &rest[1..];
        }
    }
    result.push_str(rest);
    result
}

/// Whether the top-level media type of a Content-Type value is
/// “image”. Parameters after “;” do not matter here.
fn isImageType(content_type: &str) -> bool
{
    match content_type.split_once('/')
    {
        Some((top, _)) => top.trim().eq_ignore_ascii_case("image"),
        None => false,
    }
}

/// The parts of the post info from the e926 API that matter here.
/// Everything else in the response is ignored.
#[derive(Deserialize)]
struct PostInfo
{
    file_url: String,
    author: String,
}

/// The e621/e926 URL resolver. An instance holds only immutable
/// configuration, so one resolver can serve any number of
/// submissions.
pub struct Resolver
{
    useragent: String,
    pattern: Regex,
    api_endpoint: String,
}

impl Resolver
{
    /// Create a resolver that identifies itself to the sites as
    /// `useragent`.
    pub fn new(useragent: &str) -> Result<Self, Error>
    {
        Ok(Self {
            useragent: useragent.to_owned(),
            pattern: Regex::new(URL_PATTERN).map_err(
                |_| rterr!("Failed to compile URL pattern"))?,
            api_endpoint: API_ENDPOINT.to_owned(),
        })
    }

    pub fn fromConfig(config: &Config) -> Result<Self, Error>
    {
        Self::new(&config.useragent)
    }

    /// Match `raw_url` against the site pattern, after decoding HTML
    /// entities. Return the decoded URL and maybe a post ID, or None
    /// if this is not an e621/e926 URL.
    fn recognize(&self, raw_url: &str) -> Option<(String, Option<String>)>
    {
        let url = unescapeHtml(raw_url);
        let id = match self.pattern.captures(&url)
        {
            Some(caps) => caps.name("id").map(|m| m.as_str().to_owned()),
            None => { return None; },
        };
        Some((url, id))
    }

    /// Ask the URL for its content type, without downloading the
    /// body.
    fn probeContentType(&self, url: &str) -> Result<String, Error>
    {
        let res = ureq::head(url).set(UA_HEADER_KEY, &self.useragent).call()
            .map_err(|e| rterr!("Failed to probe {}: {}", url, e))?;
        Ok(res.content_type().to_owned())
    }

    /// Retrieve the post info with the given ID from the API.
    fn lookupPost(&self, id: &str) -> Result<PostInfo, Error>
    {
        debug!("Will use API endpoint at {}.", self.api_endpoint);
        let res = ureq::get(&self.api_endpoint).query("id", id)
            .set(UA_HEADER_KEY, &self.useragent).call()
            .map_err(|e| rterr!("Failed to look up post {}: {}", id, e))?;
        let body = res.into_string().map_err(
            |_| rterr!("Failed to encode post info response"))?;
        serde_json::from_str(&body).map_err(
            |e| rterr!("Invalid post info for post {}: {}", id, e))
    }

    /// Resolve a recognized URL. `post_id` is the ID captured from
    /// the URL, if there was one.
    fn resolve(&self, url: &str, post_id: Option<&str>) ->
        Result<ImportResult, Error>
    {
        let content_type = self.probeContentType(url)?;
        if isImageType(&content_type)
        {
            debug!("{} is a CDN asset; no API needed.", url);
            Ok(ImportResult {
                author: AUTHOR_DIRECT.to_owned(),
                source: url.to_owned(),
                display_header: HEADER_DIRECT.to_owned(),
                image_urls: vec![url.to_owned()],
            })
        }
        else
        {
            debug!("{} is not a CDN asset; will use API.", url);
            let id = post_id.ok_or_else(
                || rterr!("No post ID in URL {}", url))?;
            let info = self.lookupPost(id)?;
            info!("Found e926 image at {}.", info.file_url);
            Ok(ImportResult {
                author: AUTHOR_LOOKUP.to_owned(),
                source: url.to_owned(),
                display_header: format!(
                    "LIVEMirrored e926 image by {}:\n\n", info.author),
                image_urls: vec![info.file_url],
            })
        }
    }
}

impl importer::Importer for Resolver
{
    fn import(&self, url: &str) -> Result<ImportResult, ImportError>
    {
        let (url, post_id) = self.recognize(url)
            .ok_or(ImportError::Unrecognized)?;
        self.resolve(&url, post_id.as_deref())
            .map_err(|cause| ImportError::Failed { url, cause })
    }
}
