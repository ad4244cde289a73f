/**
 * Document Model and Database Operations
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Attachment classification.
pub const FILE_TYPE_PDF: &str = "pdf";
pub const FILE_TYPE_IMG: &str = "img";
pub const FILE_TYPE_OTHER: &str = "other";

/// Document types are a small fixed enumeration (0..=3) mirrored by a
/// CHECK constraint.
pub const MAX_DOC_TYPE: i32 = 3;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub doc_type: i32,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    pub id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub file_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWithAttachments {
    #[serde(flatten)]
    pub document: Document,
    pub attachments: Vec<DocumentAttachment>,
}

/// Attachment about to be persisted (already written to disk).
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub filename: String,
    pub file_type: String,
    pub file_url: String,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub doc_type: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub content: Option<String>,
    pub doc_type: Option<i32>,
}

const DOCUMENT_COLUMNS: &str =
    "id, title, content, doc_type, created_by, updated_by, created_at, updated_at";
const ATTACHMENT_COLUMNS: &str = "id, document_id, filename, file_type, file_url";

/// Classify an upload by its MIME type.
pub fn classify_mime(mime: Option<&str>) -> &'static str {
    match mime {
        Some("application/pdf") => FILE_TYPE_PDF,
        Some(m) if m.starts_with("image/") => FILE_TYPE_IMG,
        _ => FILE_TYPE_OTHER,
    }
}

/// One page of documents (newest first), each with its attachments
/// joined in a single batched lookup.
pub async fn list_documents(
    pool: &PgPool,
    page: i64,
    limit: i64,
    doc_type: Option<i32>,
) -> Result<Vec<DocumentWithAttachments>, ApiError> {
    let offset = limit * (page - 1);

    let documents = match doc_type {
        Some(doc_type) => {
            sqlx::query_as::<_, Document>(&format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE doc_type = $1 \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
            ))
            .bind(doc_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Document>(&format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents \
                 ORDER BY created_at DESC LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    let ids: Vec<Uuid> = documents.iter().map(|d| d.id).collect();
    let attachments: Vec<DocumentAttachment> = if ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM document_attachments WHERE document_id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(pool)
        .await?
    };

    Ok(documents
        .into_iter()
        .map(|document| {
            let attachments = attachments
                .iter()
                .filter(|a| a.document_id == document.id)
                .cloned()
                .collect();
            DocumentWithAttachments { document, attachments }
        })
        .collect())
}

pub async fn get_document(pool: &PgPool, id: Uuid) -> Result<DocumentWithAttachments, ApiError> {
    let document = sqlx::query_as::<_, Document>(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Document not found"))?;

    let attachments = attachments_of(pool, id).await?;
    Ok(DocumentWithAttachments { document, attachments })
}

/// Insert a document and its attachments in one transaction.
pub async fn create_document(
    pool: &PgPool,
    input: NewDocument,
    files: Vec<NewAttachment>,
    actor: &str,
) -> Result<DocumentWithAttachments, ApiError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    let document_id = Uuid::new_v4();

    let document = sqlx::query_as::<_, Document>(&format!(
        r#"
        INSERT INTO documents (id, title, content, doc_type, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {DOCUMENT_COLUMNS}
        "#
    ))
    .bind(document_id)
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.doc_type)
    .bind(actor)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut attachments = Vec::with_capacity(files.len());
    for file in files {
        let attachment = sqlx::query_as::<_, DocumentAttachment>(&format!(
            r#"
            INSERT INTO document_attachments (id, document_id, filename, file_type, file_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ATTACHMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(document_id)
        .bind(&file.filename)
        .bind(&file.file_type)
        .bind(&file.file_url)
        .fetch_one(&mut *tx)
        .await?;
        attachments.push(attachment);
    }

    tx.commit().await?;
    tracing::info!("Document created: '{}' ({})", document.title, document.id);
    Ok(DocumentWithAttachments { document, attachments })
}

/// Update fields and, when new files are supplied, replace the stored
/// attachments of the same classes.
///
/// # Returns
///
/// The updated document plus the `file_url`s of replaced attachments so
/// the caller can unlink them from disk.
pub async fn update_document(
    pool: &PgPool,
    id: Uuid,
    changes: UpdateDocument,
    files: Vec<NewAttachment>,
    actor: &str,
) -> Result<(DocumentWithAttachments, Vec<String>), ApiError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let document = sqlx::query_as::<_, Document>(&format!(
        r#"
        UPDATE documents
        SET title = COALESCE($2, title),
            content = COALESCE($3, content),
            doc_type = COALESCE($4, doc_type),
            updated_by = $5,
            updated_at = $6
        WHERE id = $1
        RETURNING {DOCUMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(changes.doc_type)
    .bind(actor)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Document not found"))?;

    // Replace old attachments of the classes being re-uploaded.
    let mut replaced_urls = Vec::new();
    let replaced_types: std::collections::HashSet<&str> =
        files.iter().map(|f| f.file_type.as_str()).collect();
    for file_type in replaced_types {
        let urls: Vec<String> = sqlx::query_scalar(
            "DELETE FROM document_attachments WHERE document_id = $1 AND file_type = $2 \
             RETURNING file_url",
        )
        .bind(id)
        .bind(file_type)
        .fetch_all(&mut *tx)
        .await?;
        replaced_urls.extend(urls);
    }

    for file in files {
        sqlx::query(
            r#"
            INSERT INTO document_attachments (id, document_id, filename, file_type, file_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(&file.filename)
        .bind(&file.file_type)
        .bind(&file.file_url)
        .execute(&mut *tx)
        .await?;
    }

    // The full set after replacement; untouched classes survive.
    let attachments: Vec<DocumentAttachment> = sqlx::query_as(&format!(
        "SELECT {ATTACHMENT_COLUMNS} FROM document_attachments WHERE document_id = $1"
    ))
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((
        DocumentWithAttachments { document, attachments },
        replaced_urls,
    ))
}

/// Delete a document and its attachment rows.
///
/// # Returns
///
/// The `file_url`s of all attachments so the caller can unlink the
/// files (best effort, outside the transaction).
pub async fn delete_document(pool: &PgPool, id: Uuid) -> Result<Vec<String>, ApiError> {
    let mut tx = pool.begin().await?;

    let urls: Vec<String> = sqlx::query_scalar(
        "DELETE FROM document_attachments WHERE document_id = $1 RETURNING file_url",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Document not found"));
    }

    tx.commit().await?;
    tracing::info!("Document deleted: {}", id);
    Ok(urls)
}

async fn attachments_of(pool: &PgPool, id: Uuid) -> Result<Vec<DocumentAttachment>, ApiError> {
    let attachments = sqlx::query_as::<_, DocumentAttachment>(&format!(
        "SELECT {ATTACHMENT_COLUMNS} FROM document_attachments WHERE document_id = $1"
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(attachments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_mime() {
        assert_eq!(classify_mime(Some("application/pdf")), FILE_TYPE_PDF);
        assert_eq!(classify_mime(Some("image/png")), FILE_TYPE_IMG);
        assert_eq!(classify_mime(Some("image/jpeg")), FILE_TYPE_IMG);
        assert_eq!(classify_mime(Some("text/plain")), FILE_TYPE_OTHER);
        assert_eq!(classify_mime(None), FILE_TYPE_OTHER);
    }
}
