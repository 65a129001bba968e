//! Mirror file storage
//!
//! One file per URL under `<root>/<host>/<path segments>`. A trailing-slash
//! or empty path becomes an index file, and markup pages whose last segment
//! has no extension get `.html` appended so the mirrored tree is servable
//! as static files. Re-running the mirror overwrites prior files.

use std::fs;
use std::io;
use std::path::PathBuf;
use url::Url;

/// Default file name for directory-style paths
const INDEX_FILE: &str = "index.html";

/// Writes fetched bodies to disk, keyed by host and path
#[derive(Debug, Clone)]
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    pub fn new(root: PathBuf) -> Self {
        MirrorStore { root }
    }

    /// Computes the on-disk location for a URL.
    ///
    /// Returns None for URLs without a host or path segments.
    pub fn path_for(&self, url: &Url, is_markup: bool) -> Option<PathBuf> {
        let host = url.host_str()?;
        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect();

        let mut path = self.root.join(host);
        let trailing_dir = url.path().ends_with('/');

        match segments.split_last() {
            Some((last, dirs)) if !trailing_dir => {
                for dir in dirs {
                    path.push(dir);
                }
                if is_markup && !last.contains('.') {
                    path.push(format!("{}.html", last));
                } else {
                    path.push(last);
                }
            }
            _ => {
                for dir in &segments {
                    path.push(dir);
                }
                path.push(INDEX_FILE);
            }
        }

        Some(path)
    }

    /// Persists a body, creating parent directories as needed.
    pub fn store(&self, url: &Url, body: &[u8], is_markup: bool) -> io::Result<PathBuf> {
        let path = self.path_for(url, is_markup).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("url {} has no storable path", url),
            )
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, body)?;
        Ok(path)
    }
}
