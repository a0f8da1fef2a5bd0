//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Spacetraveling;

/// Delete the public directory
pub fn run(site: &Spacetraveling) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Spacetraveling::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(site.public_dir.join("post/x")).unwrap();
        fs::write(site.public_dir.join("index.html"), "<html></html>").unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());

        // Nothing to clean is not an error
        run(&site).unwrap();
    }
}
