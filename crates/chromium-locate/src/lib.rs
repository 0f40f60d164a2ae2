//! # chromium-locate
//!
//! Find a Chromium or Google Chrome executable for headless rendering, so
//! that users of `html2pdf` do not need to configure the browser path by hand
//! on a typical workstation or container image.
//!
//! ## Resolution order
//!
//! On [`locate_chromium`] (first match wins):
//!
//! 1. An explicit path passed by the caller (e.g. `--chrome`).
//! 2. `HTML2PDF_CHROME_PATH`, then `CHROME_PATH`.
//! 3. Well-known install locations for the current platform.
//! 4. Browsers downloaded by Playwright (`PLAYWRIGHT_BROWSERS_PATH`, or the
//!    default `ms-playwright` cache directory).
//! 5. Known executable names looked up on `PATH`.
//!
//! The result of the environment-driven lookup is cached for the lifetime of
//! the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chromium_locate::{locate_chromium, Locator};
//!
//! // Option A: environment-driven lookup, cached per process
//! let chrome = locate_chromium().expect("no Chromium installed");
//!
//! // Option B: explicit path with the usual fallbacks behind it
//! let chrome = Locator::from_env()
//!     .with_explicit("/opt/chrome/chrome")
//!     .locate()
//!     .expect("no Chromium installed");
//! ```
//!
//! ## Platform support
//!
//! | OS      | Executable names                                   |
//! |---------|----------------------------------------------------|
//! | Linux   | `chromium`, `chromium-browser`, `google-chrome`, … |
//! | macOS   | `Google Chrome.app`, `Chromium.app`                |
//! | Windows | `chrome.exe`                                       |

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variables consulted for an explicit browser path, in order.
pub const PATH_ENV_VARS: [&str; 2] = ["HTML2PDF_CHROME_PATH", "CHROME_PATH"];

/// Playwright's override for its browser download directory.
pub const PLAYWRIGHT_ENV_VAR: &str = "PLAYWRIGHT_BROWSERS_PATH";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by chromium-locate operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The current OS is not one we know install locations for.
    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// A path was configured explicitly but nothing executable lives there.
    #[error("Configured browser path '{}' does not exist or is not executable", .path.display())]
    ConfiguredPathInvalid { path: PathBuf },

    /// Every candidate was checked and none was usable.
    #[error(
        "No Chromium/Chrome executable found ({} locations searched).\n\
Install Chromium (e.g. `apt install chromium`) or set HTML2PDF_CHROME_PATH.",
        .searched.len()
    )]
    NotFound { searched: Vec<PathBuf> },
}

// ── Internal: platform metadata ──────────────────────────────────────────────

struct PlatformInfo {
    /// Executable names to look for on `PATH`.
    exe_names: &'static [&'static str],
    /// Absolute install locations checked before `PATH`.
    well_known: &'static [&'static str],
    /// Executable paths relative to a Playwright `chromium-*` directory.
    playwright_relative: &'static [&'static str],
}

fn detect_platform() -> Result<PlatformInfo, LocateError> {
    match std::env::consts::OS {
        "linux" => Ok(PlatformInfo {
            exe_names: &[
                "chromium",
                "chromium-browser",
                "google-chrome",
                "google-chrome-stable",
                "chrome",
                "headless_shell",
            ],
            well_known: &[
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/usr/bin/google-chrome",
                "/usr/bin/google-chrome-stable",
                "/snap/bin/chromium",
                "/opt/google/chrome/chrome",
            ],
            playwright_relative: &[
                "chrome-linux64/chrome",
                "chrome-linux/chrome",
                "chrome-linux/headless_shell",
            ],
        }),
        "macos" => Ok(PlatformInfo {
            exe_names: &["chromium", "google-chrome"],
            well_known: &[
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                "/Applications/Chromium.app/Contents/MacOS/Chromium",
                "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
            ],
            playwright_relative: &[
                "chrome-mac/Chromium.app/Contents/MacOS/Chromium",
                "chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
            ],
        }),
        "windows" => Ok(PlatformInfo {
            exe_names: &["chrome.exe", "chromium.exe"],
            well_known: &[
                r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files\Chromium\Application\chrome.exe",
            ],
            playwright_relative: &[r"chrome-win64\chrome.exe", r"chrome-win\chrome.exe"],
        }),
        os => Err(LocateError::UnsupportedPlatform { os: os.to_string() }),
    }
}

// ── Playwright cache directory resolution ───────────────────────────────────

/// Returns the directory Playwright downloads its browsers into.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/ms-playwright/`
/// - **Linux**: `~/.cache/ms-playwright/`
/// - **Windows**: `%LOCALAPPDATA%\ms-playwright\`
///
/// Override by setting `PLAYWRIGHT_BROWSERS_PATH`.
pub fn playwright_cache_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(PLAYWRIGHT_ENV_VAR) {
        if !dir.is_empty() && dir != "0" {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::cache_dir().map(|base| base.join("ms-playwright"))
}

// ── Locator ──────────────────────────────────────────────────────────────────

/// The full set of places a lookup will search.
///
/// [`Locator::from_env`] fills every field from the process environment;
/// tests build one by hand so no global state is involved.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    /// Path supplied by the caller; when set and invalid, lookup fails.
    pub explicit: Option<PathBuf>,
    /// Values of [`PATH_ENV_VARS`] that were set, in priority order.
    pub env_paths: Vec<PathBuf>,
    /// Absolute install locations.
    pub well_known: Vec<PathBuf>,
    /// Playwright browser directory and the executable paths inside one
    /// `chromium-*` entry.
    pub playwright_dir: Option<PathBuf>,
    pub playwright_relative: Vec<PathBuf>,
    /// Contents of `PATH` and the executable names to try in each entry.
    pub search_path: Option<OsString>,
    pub exe_names: Vec<String>,
}

impl Locator {
    /// Build a locator from the current platform and environment.
    pub fn from_env() -> Self {
        let env_paths = PATH_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var_os(var))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .collect();

        let mut locator = Self {
            env_paths,
            playwright_dir: playwright_cache_dir(),
            search_path: std::env::var_os("PATH"),
            ..Self::default()
        };

        if let Ok(info) = detect_platform() {
            locator.well_known = info.well_known.iter().map(PathBuf::from).collect();
            locator.playwright_relative =
                info.playwright_relative.iter().map(PathBuf::from).collect();
            locator.exe_names = info.exe_names.iter().map(|s| s.to_string()).collect();
        }

        locator
    }

    /// Prefer `path` over every other source.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Every candidate path in the order it will be tried.
    ///
    /// The explicit path is excluded; it is validated on its own.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        out.extend(self.env_paths.iter().cloned());
        out.extend(self.well_known.iter().cloned());

        if let Some(ref dir) = self.playwright_dir {
            for browser_dir in playwright_browser_dirs(dir) {
                for rel in &self.playwright_relative {
                    out.push(browser_dir.join(rel));
                }
            }
        }

        if let Some(ref path) = self.search_path {
            for entry in std::env::split_paths(path) {
                for name in &self.exe_names {
                    out.push(entry.join(name));
                }
            }
        }

        out
    }

    /// Resolve the first usable executable.
    pub fn locate(&self) -> Result<PathBuf, LocateError> {
        if let Some(ref explicit) = self.explicit {
            return if is_executable(explicit) {
                Ok(explicit.clone())
            } else {
                Err(LocateError::ConfiguredPathInvalid {
                    path: explicit.clone(),
                })
            };
        }

        let searched = self.candidates();
        match searched.iter().find(|p| is_executable(p)) {
            Some(found) => Ok(found.clone()),
            None => Err(LocateError::NotFound { searched }),
        }
    }
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Locate a browser using the process environment.
///
/// Successful lookups are cached; failures are retried on the next call so a
/// browser installed while the process runs is picked up.
pub fn locate_chromium() -> Result<PathBuf, LocateError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = Locator::from_env().locate()?;
    let _ = RESOLVED_PATH.set(path.clone());
    Ok(path)
}

/// Locate a browser, preferring `explicit` when given.
///
/// An explicit path is never cached: it is cheap to validate and callers may
/// change it between calls.
pub fn locate_chromium_with(explicit: Option<&Path>) -> Result<PathBuf, LocateError> {
    match explicit {
        Some(path) => Locator::from_env().with_explicit(path).locate(),
        None => locate_chromium(),
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

/// `chromium-<rev>` / `chromium_headless_shell-<rev>` entries, newest first.
fn playwright_browser_dirs(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("chromium"))
        })
        .collect();

    dirs.sort_by_key(|p| std::cmp::Reverse(revision_of(p)));
    dirs
}

fn revision_of(dir: &Path) -> u64 {
    dir.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rsplit('-').next())
        .and_then(|rev| rev.parse().ok())
        .unwrap_or(0)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_exe(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn detect_platform_is_supported() {
        detect_platform().expect("current platform should be supported");
    }

    #[test]
    fn platform_info_fields_nonempty() {
        let info = detect_platform().unwrap();
        assert!(!info.exe_names.is_empty());
        assert!(!info.well_known.is_empty());
        assert!(!info.playwright_relative.is_empty());
    }

    #[test]
    fn explicit_path_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join("my-chrome");
        touch_exe(&exe);

        let other = tmp.path().join("env-chrome");
        touch_exe(&other);

        let locator = Locator {
            env_paths: vec![other],
            ..Locator::default()
        }
        .with_explicit(&exe);

        assert_eq!(locator.locate().unwrap(), exe);
    }

    #[test]
    fn invalid_explicit_path_is_reported_not_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let fallback = tmp.path().join("chromium");
        touch_exe(&fallback);

        let locator = Locator {
            well_known: vec![fallback],
            ..Locator::default()
        }
        .with_explicit(tmp.path().join("missing"));

        assert!(matches!(
            locator.locate(),
            Err(LocateError::ConfiguredPathInvalid { .. })
        ));
    }

    #[test]
    fn env_path_preferred_over_well_known() {
        let tmp = tempfile::tempdir().unwrap();
        let from_env = tmp.path().join("env/chrome");
        let installed = tmp.path().join("usr/bin/chromium");
        touch_exe(&from_env);
        touch_exe(&installed);

        let locator = Locator {
            env_paths: vec![from_env.clone()],
            well_known: vec![installed],
            ..Locator::default()
        };
        assert_eq!(locator.locate().unwrap(), from_env);
    }

    #[test]
    fn playwright_newest_revision_first() {
        let tmp = tempfile::tempdir().unwrap();
        let old = tmp.path().join("chromium-999/chrome-linux/chrome");
        let new = tmp.path().join("chromium-1140/chrome-linux/chrome");
        touch_exe(&old);
        touch_exe(&new);
        fs::create_dir_all(tmp.path().join("firefox-1400")).unwrap();

        let locator = Locator {
            playwright_dir: Some(tmp.path().to_path_buf()),
            playwright_relative: vec![PathBuf::from("chrome-linux/chrome")],
            ..Locator::default()
        };
        assert_eq!(locator.locate().unwrap(), new);
    }

    #[test]
    fn search_path_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let bin_a = tmp.path().join("a");
        let bin_b = tmp.path().join("b");
        fs::create_dir_all(&bin_a).unwrap();
        touch_exe(&bin_b.join("chromium-browser"));

        let locator = Locator {
            search_path: Some(std::env::join_paths([&bin_a, &bin_b]).unwrap()),
            exe_names: vec!["chromium".into(), "chromium-browser".into()],
            ..Locator::default()
        };
        assert_eq!(locator.locate().unwrap(), bin_b.join("chromium-browser"));
    }

    #[test]
    fn not_found_lists_searched_locations() {
        let tmp = tempfile::tempdir().unwrap();
        let locator = Locator {
            well_known: vec![tmp.path().join("nope")],
            search_path: Some(tmp.path().as_os_str().to_owned()),
            exe_names: vec!["chromium".into()],
            ..Locator::default()
        };
        match locator.locate() {
            Err(LocateError::NotFound { searched }) => assert_eq!(searched.len(), 2),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let plain = tmp.path().join("chromium");
        fs::write(&plain, b"not a binary").unwrap();

        let locator = Locator {
            well_known: vec![plain],
            ..Locator::default()
        };
        assert!(locator.locate().is_err());
    }
}
