use mime_guess::from_path;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::document_content::DocumentContent;

stored_object!(Document, "document", {
    file_name: String,
    file_size: u64,
    mime_type: String,
    sha256: String
});

impl Document {
    /// Builds the metadata record for an upload. Only the digest and size of
    /// the original bytes are retained, never the bytes themselves.
    pub fn from_upload(file_name: String, bytes: &[u8]) -> Self {
        let now = Utc::now();
        let mime_type = Self::guess_mime_type(Path::new(&file_name));

        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            file_size: bytes.len() as u64,
            sha256: Self::digest(bytes),
            mime_type,
            file_name,
        }
    }

    /// Guesses the MIME type based on the file extension.
    ///
    /// # Arguments
    /// * `path` - The path to the file.
    ///
    /// # Returns
    /// * `String` - The guessed MIME type as a string.
    fn guess_mime_type(path: &Path) -> String {
        from_path(path)
            .first_or(mime::APPLICATION_OCTET_STREAM)
            .to_string()
    }

    fn digest(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    /// Removes the metadata and content records for a document. Either record
    /// may already be absent; a half-written document (metadata without
    /// content) deletes cleanly. Concurrent deletes of the same id resolve
    /// last-writer-wins.
    pub async fn delete_with_content(id: &str, db: &SurrealDbClient) -> Result<(), AppError> {
        let removed_content: Option<DocumentContent> = db.delete_item(id).await?;
        let removed_metadata: Option<Document> = db.delete_item(id).await?;

        info!(
            document_id = %id,
            had_metadata = removed_metadata.is_some(),
            had_content = removed_content.is_some(),
            "Deleted document records"
        );

        Ok(())
    }
}
