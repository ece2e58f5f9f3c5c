//! Writing rendered pages to the output directory.
//!
//! Pages are written atomically (temp file, then rename) and only when their
//! content changed, so file timestamps stay meaningful for rsync-style deploys.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use vitae_shared::{Result, VitaeError};

/// Whether a page write touched the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// New or changed content was written.
    Written,
    /// The file already held identical content.
    Unchanged,
}

/// Outcome of writing one page.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub file_name: String,
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
    pub status: WriteStatus,
}

/// Write `content` to `output_dir/file_name` unless it is already there.
pub fn write_page(output_dir: &Path, file_name: &str, content: &str) -> Result<WrittenPage> {
    std::fs::create_dir_all(output_dir).map_err(|e| VitaeError::io(output_dir, e))?;

    let target = output_dir.join(file_name);
    let hash = sha256_hex(content.as_bytes());

    let status = if existing_hash(&target)?.as_deref() == Some(hash.as_str()) {
        debug!(file = %file_name, "content unchanged, skipping write");
        WriteStatus::Unchanged
    } else {
        let temp = output_dir.join(format!(".{file_name}.tmp"));
        std::fs::write(&temp, content).map_err(|e| VitaeError::io(&temp, e))?;
        if let Err(e) = std::fs::rename(&temp, &target) {
            let _ = std::fs::remove_file(&temp);
            return Err(VitaeError::io(&target, e));
        }
        debug!(file = %file_name, size = content.len(), "wrote page");
        WriteStatus::Written
    };

    Ok(WrittenPage {
        file_name: file_name.to_string(),
        path: target,
        sha256: hash,
        size_bytes: content.len(),
        status,
    })
}

/// Hash of the file currently at `path`, if any.
fn existing_hash(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = std::fs::read(path).map_err(|e| VitaeError::io(path, e))?;
    Ok(Some(sha256_hex(&bytes)))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
