use anyhow::{Context, bail};
use std::path::{Path, PathBuf};

/// An image read from disk, ready to be attached to a multipart form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { name, bytes })
    }

    pub fn mime(&self) -> &'static str {
        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        }
    }
}

/// One path per line; blank lines and surrounding whitespace are ignored.
pub fn parse_image_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn read_image_list(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read image list {}", path.display()))?;
    Ok(parse_image_list(&contents))
}

/// Fails on the first listed path that does not point at a file. Contents
/// are only read when the image is sent.
pub fn ensure_files_exist(paths: &[PathBuf]) -> anyhow::Result<()> {
    match paths.iter().find(|path| !path.is_file()) {
        Some(missing) => bail!("image not found: {}", missing.display()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_files_exist_reports_missing_path() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        assert!(ensure_files_exist(&[manifest.clone()]).is_ok());

        let missing = PathBuf::from("does/not/exist.jpg");
        let err = ensure_files_exist(&[manifest, missing]).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.jpg"));
    }

    #[test]
    fn test_load_reads_bytes_and_name() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let file = ImageFile::load(&manifest).unwrap();
        assert_eq!(file.name, "Cargo.toml");
        assert!(!file.bytes.is_empty());
    }

    #[test]
    fn test_parse_image_list_skips_blank_lines() {
        let paths = parse_image_list("a/garment.png\n\n  b/garment.png  \n\t\n");
        assert_eq!(
            paths,
            vec![PathBuf::from("a/garment.png"), PathBuf::from("b/garment.png")]
        );
    }

    #[test]
    fn test_mime_from_extension() {
        let image = |name: &str| ImageFile {
            name: name.to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(image("look.PNG").mime(), "image/png");
        assert_eq!(image("look.jpeg").mime(), "image/jpeg");
        assert_eq!(image("look").mime(), "application/octet-stream");
    }
}
