use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::Client;

const INSTALLER_USER_AGENT: &str = concat!("ModpackInstaller/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Share links (Dropbox `?dl=1`) bounce through a few hosts before the file.
const MAX_REDIRECTS: usize = 10;

fn archive_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    // Content-Length must match the bytes written for the percentage to be right.
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    headers
}

/// Client used for modpack archive downloads.
///
/// No overall request timeout: archives can be large and slow links are
/// still valid links. Only connecting is bounded.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(INSTALLER_USER_AGENT)
        .default_headers(archive_headers())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}
