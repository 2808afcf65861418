use std::fmt;

use crate::core::error::{InstallerError, InstallerResult};

const DROPBOX_HOST_MARKER: &str = "dropbox";

/// A user-supplied link that has the shape of a modpack archive source.
///
/// Accepted shapes:
/// - anything ending in `.zip`
/// - a Dropbox share link forced to direct download (`...?dl=1`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink(String);

impl DownloadLink {
    /// The link is taken verbatim; surrounding whitespace makes it invalid.
    pub fn parse(raw: &str) -> InstallerResult<Self> {
        if is_modpack_link(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InstallerError::InvalidLink(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DownloadLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_modpack_link(link: &str) -> bool {
    if link.ends_with(".zip") {
        return true;
    }
    link.contains(DROPBOX_HOST_MARKER) && link.ends_with('1')
}
