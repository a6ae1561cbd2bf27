// File system operations for exported MIDI files
// Directory layout, collision-free file names and content hashes

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::arranger::Genre;

/// Directory holding every export of a genre
pub fn genre_dir(output_dir: &Path, genre: Genre) -> PathBuf {
    output_dir.join(genre.as_str())
}

/// Directory holding the files of one variation
pub fn variation_dir(output_dir: &Path, genre: Genre, variation: u32) -> PathBuf {
    genre_dir(output_dir, genre).join(format!("variation_{}", variation))
}

/// Dated sub-folder (`YYYY_MM_DD`) of the output directory
pub fn dated_dir(output_dir: &Path, date: NaiveDate) -> PathBuf {
    output_dir.join(date.format("%Y_%m_%d").to_string())
}

/// First path `<dir>/<stem>.<ext>`, `<dir>/<stem>_1.<ext>`, ... that does
/// not exist yet
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let mut path = dir.join(format!("{}.{}", stem, extension));
    let mut counter = 1u32;

    while path.exists() {
        path = dir.join(format!("{}_{}.{}", stem, counter, extension));
        counter += 1;
    }

    path
}

/// Store a file under `dir` without overwriting anything, returning its
/// path and SHA256 hash
///
/// Creates `dir` if needed. If another writer claims the chosen name first,
/// the next free suffix is used.
pub fn store_file(dir: &Path, stem: &str, extension: &str, data: &[u8]) -> io::Result<(PathBuf, String)> {
    fs::create_dir_all(dir)?;

    loop {
        let file_path = unique_path(dir, stem, extension);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        file.write_all(data)?;
        file.flush()?;

        return Ok((file_path, calculate_sha256(data)));
    }
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_sha256() {
        let data = b"hello world";
        let hash = calculate_sha256(data);
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_directory_layout() {
        let root = Path::new("midi");
        assert_eq!(genre_dir(root, Genre::Ukg), Path::new("midi/ukg"));
        assert_eq!(
            variation_dir(root, Genre::House, 3),
            Path::new("midi/house/variation_3")
        );

        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(dated_dir(root, date), Path::new("midi/2024_03_07"));
    }

    #[test]
    fn test_store_file_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("dnb").join("variation_1");

        let (first, first_hash) = store_file(&dir, "kick_dnb_1", "mid", b"one").unwrap();
        let (second, _) = store_file(&dir, "kick_dnb_1", "mid", b"two").unwrap();
        let (third, _) = store_file(&dir, "kick_dnb_1", "mid", b"three").unwrap();

        assert_eq!(first, dir.join("kick_dnb_1.mid"));
        assert_eq!(second, dir.join("kick_dnb_1_1.mid"));
        assert_eq!(third, dir.join("kick_dnb_1_2.mid"));

        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(first_hash, calculate_sha256(b"one"));
    }
}
