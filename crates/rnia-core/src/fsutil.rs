//! Filesystem helpers and manifest merge policies
//!
//! Everything here is idempotent and orchestration-free: deleting an absent
//! path and copying from an absent source are both no-ops, and the merge
//! functions are pure transformations over parsed documents.

use crate::error::ManifestError;
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Delete a file or directory tree. No-op if the path is absent.
pub async fn remove_recursive(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    // symlink_metadata so a link to a directory is unlinked, not traversed
    if fs::symlink_metadata(path).await?.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}

/// Deep-copy `src` into `dest`, overwriting existing destination entries.
/// No-op if `src` is absent.
pub async fn copy_recursive(src: &Path, dest: &Path) -> std::io::Result<()> {
    if !src.exists() {
        return Ok(());
    }

    if src.is_file() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(src, dest).await?;
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("unreadable directory entry"))
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| std::io::Error::other("walked entry outside copy root"))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).await?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::copy(entry.path(), &target).await?;
        }
    }

    Ok(())
}

/// Read and parse a JSON manifest document.
pub async fn read_json(path: &Path) -> Result<Value, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a JSON manifest with two-space indentation and a trailing
/// newline. Field order is whatever the document carries; the merge
/// functions below own that order.
pub async fn write_json(path: &Path, document: &Value) -> Result<(), ManifestError> {
    let mut content = serde_json::to_string_pretty(document).map_err(|source| {
        ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    content.push('\n');
    fs::write(path, content)
        .await
        .map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Derive the package manifest name from the project name: lowercase, with
/// hyphens replaced by underscores.
pub fn package_name(project_name: &str) -> String {
    project_name.to_lowercase().replace('-', "_")
}

/// Overlay the template's dependency fields onto the generated manifest.
///
/// `name` is derived from the project name, never taken from either
/// manifest. `version`, `dependencies`, `devDependencies` and `scripts`
/// mirror the template exactly, including removal when the template omits
/// one. Every other generated field survives unchanged. This is a shallow
/// field-level overwrite, not a deep merge.
pub fn merge_package_manifest(generated: &mut Value, template: &Value, project_name: &str) {
    let Some(fields) = generated.as_object_mut() else {
        return;
    };
    fields.insert(
        "name".to_string(),
        Value::String(package_name(project_name)),
    );
    for key in ["version", "dependencies", "devDependencies", "scripts"] {
        match template.get(key) {
            Some(value) => {
                fields.insert(key.to_string(), value.clone());
            }
            None => {
                fields.remove(key);
            }
        }
    }
}

/// Point the app descriptor's `name` and `displayName` at the project name,
/// leaving every other field untouched.
pub fn merge_app_config(descriptor: &mut Value, project_name: &str) {
    if let Some(fields) = descriptor.as_object_mut() {
        fields.insert(
            "name".to_string(),
            Value::String(project_name.to_string()),
        );
        fields.insert(
            "displayName".to_string(),
            Value::String(project_name.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn remove_recursive_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("never-created");
        remove_recursive(&absent).await.unwrap();

        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("nested")).await.unwrap();
        fs::write(tree.join("nested/file.txt"), "x").await.unwrap();
        remove_recursive(&tree).await.unwrap();
        assert!(!tree.exists());
        remove_recursive(&tree).await.unwrap();
    }

    #[tokio::test]
    async fn copy_recursive_from_absent_source_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("dest");
        copy_recursive(&dir.path().join("missing"), &dest)
            .await
            .unwrap();
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn copy_recursive_overwrites_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(src.join("sub")).await.unwrap();
        fs::write(src.join("a.txt"), "new").await.unwrap();
        fs::write(src.join("sub/b.txt"), "nested").await.unwrap();
        fs::create_dir_all(&dest).await.unwrap();
        fs::write(dest.join("a.txt"), "old").await.unwrap();

        copy_recursive(&src, &dest).await.unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).await.unwrap(), "new");
        assert_eq!(
            fs::read_to_string(dest.join("sub/b.txt")).await.unwrap(),
            "nested"
        );
    }

    #[tokio::test]
    async fn read_json_distinguishes_missing_from_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("package.json");
        assert!(matches!(
            read_json(&missing).await.unwrap_err(),
            ManifestError::Missing(_)
        ));

        fs::write(&missing, "{ not json").await.unwrap();
        assert!(matches!(
            read_json(&missing).await.unwrap_err(),
            ManifestError::Parse { .. }
        ));
    }

    #[test]
    fn package_name_is_lowercased_and_underscored() {
        assert_eq!(package_name("MyApp"), "myapp");
        assert_eq!(package_name("my-cool-App"), "my_cool_app");
    }

    #[test]
    fn package_merge_overwrites_listed_fields_only() {
        let mut generated = json!({
            "name": "x",
            "version": "0.0.1",
            "foo": "bar"
        });
        let template = json!({
            "version": "2.0.0",
            "dependencies": { "a": "1.0.0" },
            "scripts": { "start": "x" }
        });

        merge_package_manifest(&mut generated, &template, "MyApp");

        assert_eq!(generated["name"], "myapp");
        assert_eq!(generated["version"], "2.0.0");
        assert_eq!(generated["dependencies"], json!({ "a": "1.0.0" }));
        assert_eq!(generated["scripts"], json!({ "start": "x" }));
        assert_eq!(generated["foo"], "bar");
        // devDependencies absent from the template disappears entirely
        assert!(generated.get("devDependencies").is_none());
    }

    #[test]
    fn package_merge_is_shallow() {
        let mut generated = json!({
            "name": "x",
            "dependencies": { "react": "18.0.0", "kept-nowhere": "1.0.0" }
        });
        let template = json!({ "dependencies": { "react": "19.0.0" } });

        merge_package_manifest(&mut generated, &template, "App");

        // The template's map replaces the generated map wholesale
        assert_eq!(generated["dependencies"], json!({ "react": "19.0.0" }));
    }

    #[test]
    fn app_config_merge_touches_exactly_two_fields() {
        let mut descriptor = json!({
            "name": "Generated",
            "displayName": "Generated",
            "extra": true
        });

        merge_app_config(&mut descriptor, "MyApp");

        assert_eq!(descriptor["name"], "MyApp");
        assert_eq!(descriptor["displayName"], "MyApp");
        assert_eq!(descriptor["extra"], true);
    }
}
