//! Certificate storage and public file serving.
//!
//! Uploaded certificates live in one local directory which is created at
//! startup and served read-only under `/certificates`. No access control is
//! applied: anyone who knows a file name can download it.

use std::io;
use std::path::Path;

use tower_http::services::ServeDir;

pub const CERTIFICATES_PREFIX: &str = "/certificates";

/// Create the directory (and parents) if needed. Idempotent.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        ));
    }

    std::fs::create_dir_all(path)?;
    tracing::debug!(path = %path.display(), "Certificates directory ready");
    Ok(())
}

/// Static file service over the directory. Missing files are 404.
pub fn service(path: &Path) -> ServeDir {
    ServeDir::new(path)
}
