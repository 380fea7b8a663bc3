use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ScrubError, ScrubResult};

/// Source of raw frame bytes, addressed by locator.
///
/// Called concurrently from loader worker threads.
pub trait FrameFetcher: Send + Sync {
    /// Fetch the encoded bytes behind `locator`.
    fn fetch(&self, locator: &str) -> ScrubResult<Vec<u8>>;
}

/// Reads locators as paths below a root directory.
///
/// A leading `/` is resolved against the root (web-root style, `/frames/0001.jpg`). Parent
/// traversal and URL schemes are rejected.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetch relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory locators resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a locator resolves to.
    pub fn resolve(&self, locator: &str) -> ScrubResult<PathBuf> {
        let norm = normalize_locator(locator)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl FrameFetcher for FsFetcher {
    fn fetch(&self, locator: &str) -> ScrubResult<Vec<u8>> {
        let p = self.resolve(locator)?;
        std::fs::read(&p).map_err(|e| {
            ScrubError::asset(format!("failed to read frame '{}': {e}", p.display()))
        })
    }
}

/// Serves frames from an in-memory map. Unknown locators fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    frames: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// An empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes for `locator`, replacing previous bytes.
    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.frames.insert(locator.into(), bytes);
    }

    /// Builder-style [`MemoryFetcher::insert`].
    pub fn with(mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(locator, bytes);
        self
    }
}

impl FrameFetcher for MemoryFetcher {
    fn fetch(&self, locator: &str) -> ScrubResult<Vec<u8>> {
        self.frames
            .get(locator)
            .cloned()
            .ok_or_else(|| ScrubError::asset(format!("no frame registered for '{locator}'")))
    }
}

/// Normalize a frame locator into a root-relative path with `/` separators.
///
/// Removes empty and `.` segments; rejects `..`, URL schemes and empty results.
pub(crate) fn normalize_locator(locator: &str) -> ScrubResult<String> {
    if locator.contains("://") {
        return Err(ScrubError::validation(format!(
            "remote frame locators are not supported: '{locator}'"
        )));
    }
    let s = locator.replace('\\', "/");

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrubError::validation(
                "frame locators must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrubError::validation(
            "frame locator must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
