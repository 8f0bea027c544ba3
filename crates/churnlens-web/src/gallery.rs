//! Image listing for the visualizations page.

use std::path::Path;

/// File extensions shown in the gallery (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Names of the image files directly inside `dir`, sorted.
///
/// Subdirectories and non-UTF-8 names are skipped.
pub async fn list_images(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut images = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_image(&name) {
            images.push(name);
        }
    }

    images.sort();
    Ok(images)
}

fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions() {
        assert!(is_image("churn_by_contract.png"));
        assert!(is_image("Tenure.JPEG"));
        assert!(is_image("heatmap.svg"));
        assert!(!is_image("notes.txt"));
        assert!(!is_image("png"));
        assert!(!is_image(".gitkeep"));
    }

    #[tokio::test]
    async fn lists_only_image_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "readme.md", "c.webp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = list_images(dir.path()).await.unwrap();
        assert_eq!(images, vec!["a.JPG", "b.png", "c.webp"]);
    }

    #[tokio::test]
    async fn missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_images(&dir.path().join("absent")).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
