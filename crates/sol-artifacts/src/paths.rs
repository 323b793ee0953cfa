//! Path utilities for the artifacts directory layout.
//!
//! ```text
//! <root>/<sourceName>/<ContractName>.json       artifact
//! <root>/<sourceName>/<ContractName>.dbg.json   debug file -> build info
//! <root>/build-info/<id>.json                   build info
//! ```

use anyhow::{anyhow, bail, Result};
use std::path::{Component, Path, PathBuf};

use sol_sandbox_types::FullyQualifiedName;

pub const BUILD_INFO_DIR: &str = "build-info";
pub const DEBUG_FILE_SUFFIX: &str = ".dbg.json";

/// Reject source names that would escape the artifacts root.
pub fn validate_source_name(source_name: &str) -> Result<()> {
    if source_name.is_empty() {
        bail!("Empty source name");
    }
    let path = Path::new(source_name);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => bail!(
                "Invalid source name \"{}\": must be a relative path without '..'",
                source_name
            ),
        }
    }
    if path.components().next() == Some(Component::Normal(BUILD_INFO_DIR.as_ref())) {
        bail!("Invalid source name \"{}\": reserved directory", source_name);
    }
    Ok(())
}

/// Reject names whose artifact or debug file would resolve outside the root.
pub fn validate_fully_qualified_name(fqn: &FullyQualifiedName) -> Result<()> {
    validate_source_name(&fqn.source_name)?;
    let contract = fqn.contract_name.as_str();
    if contract.is_empty() || matches!(contract, "." | "..") || contract.contains(['/', '\\']) {
        bail!("Invalid contract name \"{}\" in \"{}\"", contract, fqn);
    }
    Ok(())
}

/// Directory holding every artifact compiled from `source_name`.
pub fn source_dir(root: &Path, source_name: &str) -> PathBuf {
    root.join(source_name)
}

/// Full path of a contract's artifact file.
pub fn artifact_path(root: &Path, fqn: &FullyQualifiedName) -> PathBuf {
    source_dir(root, &fqn.source_name).join(format!("{}.json", fqn.contract_name))
}

/// Full path of a contract's debug file.
pub fn debug_file_path(root: &Path, fqn: &FullyQualifiedName) -> PathBuf {
    source_dir(root, &fqn.source_name).join(format!("{}{}", fqn.contract_name, DEBUG_FILE_SUFFIX))
}

/// Full path of a build info file.
pub fn build_info_path(root: &Path, id: &str) -> PathBuf {
    root.join(BUILD_INFO_DIR).join(format!("{}.json", id))
}

/// The `buildInfo` value stored in a debug file: the build info path relative
/// to the debug file's directory (`contracts/A.sol` -> `../../build-info/<id>.json`).
pub fn relative_build_info_path(source_name: &str, id: &str) -> String {
    let depth = Path::new(source_name)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();
    format!("{}{}/{}.json", "../".repeat(depth), BUILD_INFO_DIR, id)
}

/// Create the directories above `path` that are missing.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Replace `path` with `contents` so readers see the old file or the new one,
/// never a partial write: the bytes go to a sibling `.tmp` file first.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}

/// Atomically store `value` as compact JSON. Used for build info, which is
/// read by machines only and can be large.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value).map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
    atomic_write(path, &json)
}

/// Atomically store `value` as indented JSON, the way artifacts and debug
/// files are laid out on disk.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
    atomic_write(path, &json)
}
