//! Downloading and extracting the project template
//!
//! The template is fetched as a gzip tarball from the repository's branch
//! archive endpoint, streamed to disk inside a fresh scratch directory, and
//! extracted with the archive's synthetic top-level folder stripped so the
//! extracted tree is rooted at the template content itself.

use crate::error::FetchError;
use flate2::read::GzDecoder;
use std::path::{Path, PathBuf};
use tar::Archive;
use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Repository hosting the project template.
pub const DEFAULT_TEMPLATE_REPO: &str = "CrisangerA/react-native-template";

/// Branch whose archive is downloaded.
pub const DEFAULT_TEMPLATE_BRANCH: &str = "main";

/// Environment variable overriding the template archive URL.
const TEMPLATE_URL_ENV: &str = "RNIA_TEMPLATE_URL";

/// Top-level entries every usable template must contain.
const REQUIRED_ENTRIES: &[&str] = &["src", "package.json", "tsconfig.json"];

/// Extracted template contents plus the scratch directory that owns them.
///
/// The handle exclusively owns the scratch directory from the moment the
/// fetch succeeds until the pipeline run ends; it is released exactly once
/// per run and never reused.
#[derive(Debug)]
pub struct TemplateHandle {
    scratch: TempDir,
    root: PathBuf,
}

impl TemplateHandle {
    /// Wrap an already-extracted template rooted inside a scratch directory.
    ///
    /// The fetcher is the normal producer; tests hand the pipeline local
    /// fixtures through this.
    pub fn new(scratch: TempDir, root: PathBuf) -> Self {
        Self { scratch, root }
    }

    /// Path to the extracted template contents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the owning scratch directory.
    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    /// Delete the scratch directory. A deletion failure is downgraded to a
    /// warning; dropping the handle is the fallback cleanup path.
    pub fn release(self) {
        if let Err(e) = self.scratch.close() {
            eprintln!("Warning: failed to clean up temp directory: {}", e);
        }
    }
}

/// Template fetcher - one network request, disk writes under the OS temp
/// directory only.
pub struct TemplateFetcher {
    archive_url: Url,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Fetcher for the default template repository, honoring the
    /// environment override.
    pub fn new() -> Result<Self, FetchError> {
        let url = match std::env::var(TEMPLATE_URL_ENV) {
            Ok(url) => Url::parse(&url).map_err(|source| FetchError::InvalidUrl { url, source })?,
            Err(_) => Self::branch_archive_url(DEFAULT_TEMPLATE_REPO, DEFAULT_TEMPLATE_BRANCH)?,
        };
        Ok(Self::with_archive_url(url))
    }

    /// Fetcher pointed at an explicit archive URL.
    pub fn with_archive_url(archive_url: Url) -> Self {
        Self {
            archive_url,
            client: reqwest::Client::builder()
                .user_agent("rnia")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Archive URL of a repository's branch tarball.
    pub fn branch_archive_url(repo: &str, branch: &str) -> Result<Url, FetchError> {
        let url = format!(
            "https://github.com/{}/archive/refs/heads/{}.tar.gz",
            repo, branch
        );
        Url::parse(&url).map_err(|source| FetchError::InvalidUrl { url, source })
    }

    /// Download and extract the template.
    ///
    /// On success ownership of the scratch directory transfers to the
    /// returned handle. On any failure the scratch directory is removed
    /// before the error surfaces; the caller never sees a partially
    /// populated scratch root.
    pub async fn fetch(
        &self,
        progress: Option<&(dyn Fn(&str) + Send + Sync)>,
    ) -> Result<TemplateHandle, FetchError> {
        let report = |message: &str| {
            if let Some(progress) = progress {
                progress(message);
            }
        };

        let scratch = tempfile::Builder::new().prefix("rnia-").tempdir()?;
        let tarball_path = scratch.path().join("template.tar.gz");
        let extract_path = scratch.path().join("template");

        report("📥 Downloading template from GitHub...");

        let mut response = self.client.get(self.archive_url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        // Stream the body to disk; the archive is never held in memory.
        let mut tarball = fs::File::create(&tarball_path).await?;
        while let Some(chunk) = response.chunk().await? {
            tarball.write_all(&chunk).await?;
        }
        tarball.flush().await?;

        report("📦 Extracting template...");

        fs::create_dir_all(&extract_path).await?;
        extract_tarball(&tarball_path, &extract_path)?;

        for entry in REQUIRED_ENTRIES {
            if !extract_path.join(entry).exists() {
                return Err(FetchError::IncompleteTemplate(entry.to_string()));
            }
        }

        report("✅ Template downloaded successfully");

        Ok(TemplateHandle::new(scratch, extract_path))
    }
}

/// Unpack a `.tar.gz` archive into `dest`, stripping exactly one leading
/// path component (the synthetic `{repo}-{branch}/` folder every branch
/// archive wraps its contents in).
fn extract_tarball(tarball: &Path, dest: &Path) -> Result<(), FetchError> {
    let file = std::fs::File::open(tarball)?;
    let gz = GzDecoder::new(file);
    let mut archive = Archive::new(gz);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?;

        let stripped: PathBuf = entry_path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        // Reject absolute paths and traversal attempts.
        if stripped.is_absolute() || stripped.components().any(|c| c.as_os_str() == "..") {
            continue;
        }

        let out_path = dest.join(&stripped);
        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            entry.unpack(&out_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn build_tarball(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
        let tarball_path = dir.join("fixture.tar.gz");
        let file = std::fs::File::create(&tarball_path).unwrap();
        let gz = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(gz);

        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, contents.as_bytes())
                .unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
        tarball_path
    }

    #[test]
    fn release_removes_the_scratch_directory() {
        let scratch = tempfile::Builder::new().prefix("rnia-").tempdir().unwrap();
        let path = scratch.path().to_path_buf();
        let root = path.join("template");
        std::fs::create_dir_all(&root).unwrap();

        TemplateHandle::new(scratch, root).release();
        assert!(!path.exists());
    }

    #[test]
    fn dropping_a_handle_removes_the_scratch_directory() {
        // the cancellation path: the handle unwinds without an explicit
        // release
        let scratch = tempfile::Builder::new().prefix("rnia-").tempdir().unwrap();
        let path = scratch.path().to_path_buf();
        let root = path.join("template");
        std::fs::create_dir_all(&root).unwrap();

        let handle = TemplateHandle::new(scratch, root);
        drop(handle);
        assert!(!path.exists());
    }

    #[test]
    fn archive_url_points_at_the_branch_tarball() {
        let url = TemplateFetcher::branch_archive_url("acme/rn-template", "main").unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/acme/rn-template/archive/refs/heads/main.tar.gz"
        );
    }

    #[tokio::test]
    async fn fetch_downloads_extracts_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let tarball = build_tarball(
            dir.path(),
            &[
                ("react-native-template-main/package.json", "{}"),
                ("react-native-template-main/tsconfig.json", "{}"),
                ("react-native-template-main/src/index.ts", "export {};"),
            ],
        );
        let body = std::fs::read(&tarball).unwrap();

        let server = httpmock::MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/template.tar.gz");
            then.status(200).body(&body);
        });

        let url: Url = server.url("/template.tar.gz").parse().unwrap();
        let handle = TemplateFetcher::with_archive_url(url)
            .fetch(None)
            .await
            .unwrap();

        mock.assert();
        assert!(handle.root().join("src/index.ts").exists());
        assert!(handle.root().join("package.json").exists());

        let scratch = handle.scratch_path().to_path_buf();
        handle.release();
        assert!(!scratch.exists());
    }

    #[tokio::test]
    async fn non_2xx_response_is_an_http_status_error() {
        let server = httpmock::MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/template.tar.gz");
            then.status(404);
        });

        let url: Url = server.url("/template.tar.gz").parse().unwrap();
        let err = TemplateFetcher::with_archive_url(url)
            .fetch(None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::HttpStatus(404)));
    }

    #[tokio::test]
    async fn template_without_required_entries_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // no tsconfig.json
        let tarball = build_tarball(
            dir.path(),
            &[
                ("react-native-template-main/package.json", "{}"),
                ("react-native-template-main/src/index.ts", "export {};"),
            ],
        );
        let body = std::fs::read(&tarball).unwrap();

        let server = httpmock::MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/template.tar.gz");
            then.status(200).body(&body);
        });

        let url: Url = server.url("/template.tar.gz").parse().unwrap();
        let err = TemplateFetcher::with_archive_url(url)
            .fetch(None)
            .await
            .unwrap_err();

        match err {
            FetchError::IncompleteTemplate(entry) => assert_eq!(entry, "tsconfig.json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn extraction_strips_the_top_level_folder() {
        let dir = tempfile::tempdir().unwrap();
        let tarball = build_tarball(
            dir.path(),
            &[
                ("react-native-template-main/package.json", "{}"),
                ("react-native-template-main/src/index.ts", "export {};"),
            ],
        );

        let dest = dir.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        extract_tarball(&tarball, &dest).unwrap();

        assert!(dest.join("package.json").exists());
        assert!(dest.join("src/index.ts").exists());
        assert!(!dest.join("react-native-template-main").exists());
    }

    #[test]
    fn extraction_rejects_traversal_entries() {
        // tar::Builder refuses `..` in paths, so write the header name
        // bytes directly to fake a hostile archive.
        let dir = tempfile::tempdir().unwrap();
        let tarball_path = dir.path().join("hostile.tar.gz");
        let file = std::fs::File::create(&tarball_path).unwrap();
        let gz = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(gz);

        let mut header = tar::Header::new_gnu();
        header.set_size(4);
        header.set_mode(0o644);
        let name = b"top/../../escape.txt";
        header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
        header.set_cksum();
        builder.append(&header, &b"nope"[..]).unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_size(4);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "top/ok.txt", &b"fine"[..])
            .unwrap();

        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();

        let dest = dir.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        extract_tarball(&tarball_path, &dest).unwrap();

        assert!(dest.join("ok.txt").exists());
        assert!(!dir.path().join("escape.txt").exists());
    }
}
