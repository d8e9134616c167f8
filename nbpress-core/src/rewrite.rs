//! Rewrites `![png](...)` image references so they point at the relocated asset folder.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::PublishError;
use crate::progress::Progress;

/// Image references emitted by nbconvert for PNG cell output.
///
/// Only the `png` alt text is recognised, and only paths made of word
/// characters, `/`, `.` and `-`.
static PNG_REFERENCE: OnceLock<Regex> = OnceLock::new();

fn png_reference() -> &'static Regex {
    PNG_REFERENCE.get_or_init(|| {
        Regex::new(r"!\[png\]\(([\w/.\-]+)\)").expect("image reference pattern is valid")
    })
}

/// Prefix every `![png](path)` reference in `text` with `/<prefix>/`.
///
/// Not idempotent: already rewritten references match again and gain a second
/// prefix.
pub fn fix_image_paths<'t>(text: &'t str, prefix: &str) -> Cow<'t, str> {
    png_reference().replace_all(text, |caps: &Captures<'_>| {
        format!("![png](/{prefix}/{})", &caps[1])
    })
}

/// Number of references [`fix_image_paths`] would rewrite.
pub fn count_references(text: &str) -> usize {
    png_reference().find_iter(text).count()
}

/// Rewrite the converted document at `path` in place, returning how many
/// references were rewritten. In dry-run mode the file is neither read nor written.
pub fn rewrite_document<P>(
    path: &Path,
    prefix: &str,
    dry_run: bool,
    progress: &P,
) -> Result<usize, PublishError>
where
    P: Progress + ?Sized,
{
    progress.step(&format!("Fixing image filepaths in: {}", path.display()));
    if dry_run {
        info!(path = %path.display(), prefix, "Dry run: skipping image path rewrite");
        return Ok(0);
    }

    let original = std::fs::read_to_string(path).map_err(|e| PublishError::io(path, e))?;
    let count = count_references(&original);
    let fixed = fix_image_paths(&original, prefix);
    std::fs::write(path, fixed.as_bytes()).map_err(|e| PublishError::io(path, e))?;

    info!(path = %path.display(), references = count, "Rewrote image references");
    debug!(prefix, "Image references now point under /{prefix}/");
    Ok(count)
}
