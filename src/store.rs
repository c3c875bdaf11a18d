use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use crate::bitmap::Bitmap;
use crate::error::SnapshotError;

/// Encodes a bitmap as PNG bytes.
pub(crate) fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, SnapshotError> {
    let image = bitmap.to_image();
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|source| SnapshotError::Encode { source })?;
    Ok(buffer)
}

/// Writes a bitmap as a PNG file, creating parent directories and
/// overwriting any existing file at `path`.
pub(crate) fn write_png(path: &Path, bitmap: &Bitmap) -> Result<(), SnapshotError> {
    let bytes = encode_png(bitmap)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and decodes a PNG file into a bitmap.
pub(crate) fn read_png(path: &Path) -> Result<Bitmap, SnapshotError> {
    let bytes = fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png).map_err(
        |source| SnapshotError::Decode {
            path: path.to_path_buf(),
            source,
        },
    )?;
    Ok(Bitmap::from_image(&image.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_preserves_pixels() {
        let bitmap = Bitmap::from_rgba(2, 1, vec![5, 6, 7, 255, 8, 9, 10, 128]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("roundtrip.png");

        write_png(&path, &bitmap).unwrap();
        let decoded = read_png(&path).unwrap();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn read_maps_missing_file_to_io() {
        let dir = tempfile::tempdir().unwrap();
        let error = read_png(&dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(error, SnapshotError::Io { .. }));
    }

    #[test]
    fn read_maps_garbage_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        fs::write(&path, b"not a png").unwrap();
        let error = read_png(&path).unwrap_err();
        assert!(matches!(error, SnapshotError::Decode { .. }));
    }
}
