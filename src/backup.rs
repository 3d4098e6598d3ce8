use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::storage;

const MANIFEST_ENTRY: &str = "manifest.json";
pub const BUNDLE_FORMAT_V1: &str = "schoold-workspace-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub slot_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub slot_count: usize,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Bundle the five collection slots plus a checksum manifest into a zip.
/// The caller is expected to snapshot the store first so every slot exists.
pub fn export_workspace_bundle(
    workspace_path: &Path,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let mut slots: Vec<(&str, Vec<u8>)> = Vec::new();
    for slot in storage::ALL_SLOTS {
        let path = storage::slot_path(workspace_path, slot);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("missing slot {}", path.to_string_lossy()))?;
        slots.push((slot, bytes));
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut checksums = serde_json::Map::new();
    for (slot, bytes) in &slots {
        checksums.insert((*slot).to_string(), json!(sha256_hex(bytes)));
    }
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "checksums": checksums,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (slot, bytes) in &slots {
        let entry = format!("slots/{slot}.json");
        zip.start_file(&entry, opts)
            .with_context(|| format!("failed to start entry {entry}"))?;
        zip.write_all(bytes)
            .with_context(|| format!("failed to write entry {entry}"))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        slot_count: slots.len(),
    })
}

/// Extract a bundle's slots into the workspace, verifying the format tag and
/// every checksum before any slot is moved into place.
pub fn import_workspace_bundle(
    in_path: &Path,
    workspace_path: &Path,
) -> anyhow::Result<ImportSummary> {
    if !is_zip_file(in_path)? {
        return Err(anyhow!(
            "not a workspace bundle: {}",
            in_path.to_string_lossy()
        ));
    }
    storage::ensure_workspace(workspace_path)?;

    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let checksums = manifest
        .get("checksums")
        .and_then(|v| v.as_object())
        .ok_or_else(|| anyhow!("manifest missing checksums"))?;

    // Stage every slot before renaming any, so a bad bundle cannot leave a
    // half-replaced workspace.
    let mut staged: Vec<(String, PathBuf)> = Vec::new();
    for slot in storage::ALL_SLOTS {
        let entry = format!("slots/{slot}.json");
        let mut bytes = Vec::new();
        archive
            .by_name(&entry)
            .with_context(|| format!("bundle missing {entry}"))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read {entry}"))?;

        let expected = checksums
            .get(slot)
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("manifest missing checksum for {slot}"))?;
        let actual = sha256_hex(&bytes);
        if actual != expected {
            return Err(anyhow!(
                "checksum mismatch for {slot}: expected {expected}, got {actual}"
            ));
        }

        let tmp = workspace_path.join(format!("{slot}.json.importing"));
        std::fs::write(&tmp, &bytes)
            .with_context(|| format!("failed to stage {}", tmp.to_string_lossy()))?;
        staged.push((slot.to_string(), tmp));
    }

    for (slot, tmp) in &staged {
        let dst = storage::slot_path(workspace_path, slot);
        std::fs::rename(tmp, &dst).with_context(|| {
            format!(
                "failed to move slot into place: {}",
                dst.to_string_lossy()
            )
        })?;
    }

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        slot_count: staged.len(),
    })
}

fn is_zip_file(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    if read < 4 {
        return Ok(false);
    }
    Ok(sig == [0x50, 0x4B, 0x03, 0x04])
}
