use crate::stored_object;

/// Supported document container formats, dispatched on file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Txt,
    Docx,
    Xlsx,
    Zip,
}

impl DocumentFormat {
    /// Maps a file extension (with or without the leading dot, any case) to a
    /// format. Returns `None` for anything outside the supported set.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Zip => "zip",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an extracted archive, in original archive order. The text is
/// either the extracted content or an inline placeholder for entries that
/// could not be processed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArchiveEntry {
    pub path: String,
    pub text: String,
}

/// Extraction result, tagged by source format. Single text payload for flat
/// documents, an ordered path/text listing for archives.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "format", content = "content", rename_all = "lowercase")]
pub enum ExtractedContent {
    Pdf(String),
    Txt(String),
    Docx(String),
    Xlsx(String),
    Zip(Vec<ArchiveEntry>),
}

impl ExtractedContent {
    pub fn format(&self) -> DocumentFormat {
        match self {
            Self::Pdf(_) => DocumentFormat::Pdf,
            Self::Txt(_) => DocumentFormat::Txt,
            Self::Docx(_) => DocumentFormat::Docx,
            Self::Xlsx(_) => DocumentFormat::Xlsx,
            Self::Zip(_) => DocumentFormat::Zip,
        }
    }

    /// Flattens the content into a single query-ready text block. Archive
    /// entries are labeled with their path so answers can reference them.
    pub fn combined_text(&self) -> String {
        match self {
            Self::Pdf(text) | Self::Txt(text) | Self::Docx(text) | Self::Xlsx(text) => {
                text.clone()
            }
            Self::Zip(entries) => entries
                .iter()
                .map(|entry| format!("--- {} ---\n{}", entry.path, entry.text))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

stored_object!(DocumentContent, "document_content", {
    extracted: ExtractedContent
});

impl DocumentContent {
    /// Content records share the id of their document, keeping the two
    /// records associated without a join table.
    pub fn new(document_id: String, extracted: ExtractedContent) -> Self {
        let now = Utc::now();
        Self {
            id: document_id,
            created_at: now,
            updated_at: now,
            extracted,
        }
    }
}
