use std::io::{Cursor, Read};

use common::{error::AppError, storage::types::document_content::ArchiveEntry};
use tracing::warn;
use zip::ZipArchive;

use super::{docx, pdf, text, xlsx};

/// Extracts every file entry of a ZIP archive in archive order, dispatching
/// each on its extension. Failures stay local to the entry: an unsupported
/// or corrupt member becomes inline placeholder text instead of failing the
/// archive. Only an unreadable archive itself is fatal.
pub fn extract_archive(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, AppError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| AppError::Extraction(format!("Failed to open ZIP archive: {err}")))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|err| {
            AppError::Extraction(format!("Failed to read ZIP entry {index}: {err}"))
        })?;
        if entry.is_dir() {
            continue;
        }

        let path = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(|err| {
            AppError::Extraction(format!("Failed to read ZIP entry {path}: {err}"))
        })?;

        let extension = entry_extension(&path);
        let text = extract_entry(&data, &extension);
        entries.push(ArchiveEntry { path, text });
    }

    Ok(entries)
}

fn extract_entry(data: &[u8], extension: &str) -> String {
    let result = match extension {
        "pdf" => pdf::extract_pdf(data),
        "txt" => Ok(text::extract_text(data)),
        "docx" => docx::extract_docx(data),
        "xlsx" => xlsx::extract_xlsx(data),
        _ => return format!("[Unsupported file type: .{extension}]"),
    };

    match result {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "Archive entry failed to extract");
            format!("[Error processing file: {err}]")
        }
    }
}

fn entry_extension(path: &str) -> String {
    path.rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            writer
                .start_file(*name, options)
                .expect("Failed to start zip entry");
            writer.write_all(data).expect("Failed to write zip entry");
        }
        writer
            .finish()
            .expect("Failed to finish zip")
            .into_inner()
    }

    #[test]
    fn test_rejects_non_zip_bytes() {
        let result = extract_archive(b"not an archive");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_extracts_supported_and_placeholders_unsupported() {
        let bytes = build_zip(&[
            ("readme.txt", b"hello from the archive"),
            ("tool.exe", b"\x4d\x5a\x90\x00"),
        ]);

        let entries = extract_archive(&bytes).expect("Failed to extract archive");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "readme.txt");
        assert_eq!(entries[0].text, "hello from the archive");
        assert_eq!(entries[1].path, "tool.exe");
        assert_eq!(entries[1].text, "[Unsupported file type: .exe]");
    }

    #[test]
    fn test_corrupt_entry_does_not_abort_archive() {
        let bytes = build_zip(&[
            ("broken.pdf", b"these bytes are not a pdf"),
            ("notes.txt", b"still fine"),
        ]);

        let entries = extract_archive(&bytes).expect("Failed to extract archive");
        assert_eq!(entries.len(), 2);
        assert!(
            entries[0].text.starts_with("[Error processing file:"),
            "corrupt entry must yield a placeholder, got: {}",
            entries[0].text
        );
        assert_eq!(entries[1].text, "still fine");
    }

    #[test]
    fn test_directories_are_skipped() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer
            .add_directory("nested/", options)
            .expect("Failed to add directory");
        writer
            .start_file("nested/inner.txt", options)
            .expect("Failed to start zip entry");
        writer
            .write_all(b"inner content")
            .expect("Failed to write zip entry");
        let bytes = writer
            .finish()
            .expect("Failed to finish zip")
            .into_inner();

        let entries = extract_archive(&bytes).expect("Failed to extract archive");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "nested/inner.txt");
        assert_eq!(entries[0].text, "inner content");
    }

    #[test]
    fn test_entry_without_extension_is_placeholder() {
        let bytes = build_zip(&[("LICENSE", b"some license text")]);

        let entries = extract_archive(&bytes).expect("Failed to extract archive");
        assert_eq!(entries[0].text, "[Unsupported file type: .]");
    }
}
