//! Reference image loading
//!
//! Failed loads never abort a run: the entry is logged and left out, so the
//! returned list can be shorter than the input (or empty).

use super::grayscale::dynamic_to_luma;
use super::types::Template;
use std::path::{Path, PathBuf};

/// Load each path as a color image and convert it to grayscale, keeping input order
pub fn load_templates<P: AsRef<Path>>(paths: &[P]) -> Vec<Template> {
    let mut templates = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        if let Some(template) = load_template(path) {
            log::debug!(
                "Loaded template '{}' ({}x{}) from {}",
                template.name,
                template.width(),
                template.height(),
                path.display()
            );
            templates.push(template);
        }
    }

    log::info!("🖼️ Loaded {}/{} templates", templates.len(), paths.len());
    templates
}

/// Scan a directory for PNG templates and load them in file-name order
pub fn load_templates_from_directory(directory: &Path) -> Vec<Template> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "⚠️ Template directory {} unreadable: {}",
                directory.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    paths.sort();

    load_templates(&paths)
}

fn load_template(path: &Path) -> Option<Template> {
    let image = match image::open(path) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("⚠️ Skipping template {}: {}", path.display(), e);
            return None;
        }
    };

    if image.width() == 0 || image.height() == 0 {
        log::warn!("⚠️ Skipping empty template {}", path.display());
        return None;
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    Some(Template::new(name, dynamic_to_luma(&image)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([10, 200, 30]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_missing_files_are_skipped_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "manA.png", 8, 6);
        let missing = dir.path().join("manB.png");
        let c = write_png(dir.path(), "manC.png", 5, 9);

        let templates = load_templates(&[a, missing, c]);

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].name, "manA");
        assert_eq!((templates[0].width(), templates[0].height()), (8, 6));
        assert_eq!(templates[1].name, "manC");
        assert_eq!((templates[1].width(), templates[1].height()), (5, 9));
    }

    #[test]
    fn test_color_template_converted_with_bt601() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "manA.png", 3, 3);

        let templates = load_templates(&[path]);
        assert_eq!(templates[0].image().get_pixel(1, 1), &image::Luma([124]));
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.png");
        std::fs::write(&bad, b"not an image").unwrap();

        assert!(load_templates(&[bad]).is_empty());
    }

    #[test]
    fn test_directory_loads_png_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 4, 4);
        write_png(dir.path(), "a.png", 3, 3);
        std::fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let templates = load_templates_from_directory(dir.path());
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_templates_from_directory(&dir.path().join("nope")).is_empty());
    }
}
