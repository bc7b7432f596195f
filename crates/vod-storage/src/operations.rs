//! Download, upload, and metadata operations.

use std::path::{Path, PathBuf};

use aws_sdk_s3::primitives::ByteStream;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use vod_models::media::delivery_content_type;

use crate::client::StorageClient;
use crate::error::{StorageError, StorageResult};

/// Resolves a content type for a local file about to be uploaded.
///
/// A transcoder may supply its own resolver; `None` falls back to the
/// delivery extension table.
pub type ContentTypeResolver<'a> = &'a (dyn Fn(&Path) -> Option<&'static str> + Send + Sync);

impl StorageClient {
    /// Content type recorded on the raw object, fetched without the body.
    pub async fn head_content_type(&self, key: &str) -> StorageResult<Option<String>> {
        let head = self
            .s3
            .head_object()
            .bucket(&self.config.raw_bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::head(key, e))?;

        Ok(head.content_type().map(|s| s.to_string()))
    }

    /// Stream a raw object to `local_path`, creating parent directories.
    pub async fn download(&self, key: &str, local_path: &Path) -> StorageResult<()> {
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut object = self
            .s3
            .get_object()
            .bucket(&self.config.raw_bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::download(key, e))?;

        let mut file = tokio::fs::File::create(local_path).await?;
        let mut bytes_written: u64 = 0;
        while let Some(chunk) = object
            .body
            .try_next()
            .await
            .map_err(|e| StorageError::download(key, e))?
        {
            bytes_written += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!("Downloaded {} ({} bytes)", key, bytes_written);
        Ok(())
    }

    /// Upload one file to the processed bucket.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::upload(key, e))?;

        self.s3
            .put_object()
            .bucket(&self.config.processed_bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload(key, e))?;

        debug!("Uploaded {} ({})", key, content_type);
        Ok(())
    }

    /// Upload every regular file under `local_root` to
    /// `remote_prefix/<relative-path>`, forward slashes on the remote side.
    ///
    /// Not atomic: a failure leaves earlier files uploaded. Returns the
    /// number of files uploaded.
    pub async fn upload_directory(
        &self,
        local_root: &Path,
        remote_prefix: &str,
        resolver: Option<ContentTypeResolver<'_>>,
    ) -> StorageResult<usize> {
        let files = collect_files(local_root)?;

        for path in &files {
            let key = remote_key(local_root, path, remote_prefix);
            let content_type = resolver
                .and_then(|r| r(path))
                .unwrap_or_else(|| delivery_content_type(path));

            self.upload_file(path, &key, content_type).await?;
        }

        info!(
            "Uploaded {} files from {} to {}/",
            files.len(),
            local_root.display(),
            remote_prefix
        );
        Ok(files.len())
    }
}

/// Remote key for a local file: `prefix/relative`, forward slashes
/// regardless of the host path separator.
pub(crate) fn remote_key(root: &Path, path: &Path, prefix: &str) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if prefix.is_empty() {
        relative
    } else {
        format!("{}/{}", prefix, relative)
    }
}

/// Every regular file under `root`, sorted.
pub(crate) fn collect_files(root: &Path) -> StorageResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_key_uses_forward_slashes() {
        let root = Path::new("/tmp/out");
        let file = root.join("stream_0").join("seg_000.ts");
        assert_eq!(
            remote_key(root, &file, "projA/raw"),
            "projA/raw/stream_0/seg_000.ts"
        );
    }

    #[test]
    fn test_remote_key_with_empty_prefix() {
        let root = Path::new("/tmp/out");
        let file = root.join("master.m3u8");
        assert_eq!(remote_key(root, &file, ""), "master.m3u8");
    }

    #[test]
    fn test_collect_files_finds_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("root.txt"), b"1").unwrap();
        std::fs::write(dir.path().join("a/mid.txt"), b"2").unwrap();
        std::fs::write(dir.path().join("a/b/leaf.txt"), b"3").unwrap();

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);

        let keys: Vec<String> = files
            .iter()
            .map(|f| remote_key(dir.path(), f, "p"))
            .collect();
        assert!(keys.contains(&"p/root.txt".to_string()));
        assert!(keys.contains(&"p/a/mid.txt".to_string()));
        assert!(keys.contains(&"p/a/b/leaf.txt".to_string()));

        // Exactly once each
        let mut deduped = keys.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }
}
