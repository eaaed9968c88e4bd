//! Shared fixtures for integration tests

use std::path::Path;

/// Create a valid ZIP archive containing a single file with the given name and content
pub fn create_zip_archive(archive_path: &Path, file_name: &str, content: &[u8]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    writer.start_file(file_name, options).unwrap();
    std::io::Write::write_all(&mut writer, content).unwrap();
    writer.finish().unwrap();
}
