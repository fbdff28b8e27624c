//! Sitemap persistence

use crate::output::{OutputError, OutputResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the path the document for `filename` is written to
///
/// ```
/// use std::path::Path;
/// use sumi_sitemap::output::sitemap_path;
///
/// assert_eq!(sitemap_path(Path::new("public"), "sitemap"), Path::new("public/sitemap.xml"));
/// ```
pub fn sitemap_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(format!("{}.xml", filename))
}

/// Writes the rendered sitemap to `<dir>/<filename>.xml`
///
/// The directory is created if it does not exist yet.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Failed to create the directory or write the file
pub fn write_sitemap(dir: &Path, filename: &str, document: &str) -> OutputResult<PathBuf> {
    if filename.is_empty() {
        return Err(OutputError::Write("sitemap filename is empty".to_string()));
    }

    fs::create_dir_all(dir)?;

    let path = sitemap_path(dir, filename);
    let mut file = File::create(&path)?;
    file.write_all(document.as_bytes())?;
    file.flush()?;

    tracing::info!("Sitemap written to {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_sitemap() {
        let dir = TempDir::new().unwrap();
        let path = write_sitemap(dir.path(), "sitemap", "<urlset/>").unwrap();

        assert_eq!(path, dir.path().join("sitemap.xml"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<urlset/>");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public").join("maps");

        let path = write_sitemap(&nested, "site", "x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_filename_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            write_sitemap(dir.path(), "", "x"),
            Err(OutputError::Write(_))
        ));
    }
}
