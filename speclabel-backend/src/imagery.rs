//! Image locator for the pre-rendered spectral-line crops.
//!
//! Each observation may have up to two images, produced externally:
//! `{obsid}_Li_region.jpg` in the Li directory and
//! `{obsid}_Halpha_region.jpg` in the Halpha directory. A missing file is
//! "no image available", never an error.

use std::path::{Path, PathBuf};

pub const LI_SUFFIX: &str = "_Li_region.jpg";
pub const HALPHA_SUFFIX: &str = "_Halpha_region.jpg";

/// Which of the two crops exist on disk for an observation.
#[derive(Debug)]
pub struct SpectrumImages {
    pub li_img: Option<String>,
    pub halpha_img: Option<String>,
}

/// Check both directories for the observation's crops at lookup time.
pub fn locate(li_dir: &Path, halpha_dir: &Path, obsid: i64) -> SpectrumImages {
    let li_name = format!("{}{}", obsid, LI_SUFFIX);
    let halpha_name = format!("{}{}", obsid, HALPHA_SUFFIX);

    SpectrumImages {
        li_img: li_dir.join(&li_name).exists().then_some(li_name),
        halpha_img: halpha_dir.join(&halpha_name).exists().then_some(halpha_name),
    }
}

/// Map a requested filename to the directory it may be served from.
///
/// Only the two recognized suffixes are served, each from its own
/// directory. Path traversal attempts and hidden files are rejected.
pub fn resolve_dir(li_dir: &Path, halpha_dir: &Path, filename: &str) -> Option<PathBuf> {
    if filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.starts_with('.')
    {
        return None;
    }

    if filename.ends_with(LI_SUFFIX) {
        Some(li_dir.to_path_buf())
    } else if filename.ends_with(HALPHA_SUFFIX) {
        Some(halpha_dir.to_path_buf())
    } else {
        None
    }
}
