//! Library half of the `xcoord` CLI: document ids, config lookup and the
//! report writers. Kept out of the binary so tests can reach them.

pub mod report;

use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 digest used as a derived document id.
pub const DOC_ID_LEN: usize = 16;

/// Stable id for a document that was not given one.
pub fn doc_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = String::with_capacity(DOC_ID_LEN);
    for byte in digest.iter().take(DOC_ID_LEN / 2) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// Per-user config file, `<config dir>/xcoord/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("xcoord").join("config.toml"))
}
