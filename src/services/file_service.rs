use std::{path::Path, sync::Arc};

use uuid::Uuid;

use crate::{
    error::AppError,
    storage::{FileStore, content_type_for},
};

#[derive(Debug)]
pub struct StoredFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn FileStore>,
}

impl FileService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Stores `bytes` under a fresh random name that keeps the original extension.
    pub async fn upload(
        &self,
        caller_id: &Uuid,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        if bytes.is_empty() {
            tracing::warn!(caller_id = %caller_id, "rejected empty upload");
            return Err(AppError::bad_request("Uploaded file is empty"));
        }

        let file_name = generated_name(original_name);
        self.store
            .save(&file_name, bytes)
            .await
            .map_err(|err| AppError::internal_with_source("Failed to store file", err))?;
        tracing::info!(caller_id = %caller_id, file_name = %file_name, size = bytes.len(), "stored upload");
        Ok(file_name)
    }

    pub async fn download(
        &self,
        caller_id: &Uuid,
        file_name: &str,
    ) -> Result<StoredFile, AppError> {
        if !is_plain_name(file_name) {
            tracing::warn!(caller_id = %caller_id, file_name, "rejected download name");
            return Err(file_not_found());
        }

        let Some(bytes) = self
            .store
            .load(file_name)
            .await
            .map_err(|err| AppError::internal_with_source("Failed to read file", err))?
        else {
            tracing::warn!(caller_id = %caller_id, file_name, "download of missing file");
            return Err(file_not_found());
        };

        Ok(StoredFile {
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name),
            bytes,
        })
    }
}

fn file_not_found() -> AppError {
    AppError::not_found("File not found")
}

fn generated_name(original_name: Option<&str>) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{stem}.{}", ext.to_ascii_lowercase()),
        None => stem,
    }
}

fn is_plain_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && !file_name.contains(['/', '\\'])
        && !file_name.contains("..")
}
