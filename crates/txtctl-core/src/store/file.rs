// # File Credential Store
//
// File-based implementation of CredentialStore.
//
// ## Access Control
//
// The file is written with mode 0600 on Unix and refused on load if group or
// other permission bits are set. Only the principal that saved the
// credentials can read them back.
//
// On other platforms no permission bits are set or checked. Every load logs
// a warning, and restricting access to the file is left to the operator.
//
// ## Durability
//
// - Atomic writes: new content goes to a temporary file, then is renamed
// - No caching: every `load()` reads the file again
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "username": "alice",
//   "password": "...",
//   "saved_at": "2025-01-09T12:00:00Z"
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::credential_store::{CredentialStore, Credentials};

/// Credential file format version
const CREDENTIAL_FILE_VERSION: &str = "1.0";

/// Permission bits that must be clear on the credential file
#[cfg(unix)]
const FORBIDDEN_MODE_BITS: u32 = 0o077;

/// Mode for newly written credential files
#[cfg(unix)]
const OWNER_ONLY_MODE: u32 = 0o600;

/// Owner-only JSON credential file
///
/// Access is enforced on Unix only. Elsewhere `load` warns that the file's
/// permissions could not be verified.
///
/// # Example
///
/// ```rust,no_run
/// use txtctl_core::store::FileCredentialStore;
/// use txtctl_core::traits::{CredentialStore, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileCredentialStore::new("/home/alice/.config/txtctl/credentials.json");
///     store.save(&Credentials::new("alice", "hunter2")).await?;
///     let credentials = store.load().await?;
///     assert_eq!(credentials.username, "alice");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

/// Serializable credential file format
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct CredentialFileFormat {
    version: String,
    username: String,
    password: String,
    saved_at: chrono::DateTime<chrono::Utc>,
}

impl FileCredentialStore {
    /// Create a store backed by the given file (nothing is read until `load`)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the credential file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Refuse files that other principals can read
    #[cfg(unix)]
    async fn check_permissions(&self) -> Result<(), Error> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(&self.path).await.map_err(|e| {
            Error::credential_store(format!(
                "Failed to stat credential file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mode = metadata.permissions().mode() & 0o777;
        if mode & FORBIDDEN_MODE_BITS != 0 {
            return Err(Error::credential_store(format!(
                "Credential file {} is accessible by other users (mode {:o}). \
                Restrict it with: chmod 600 {}",
                self.path.display(),
                mode,
                self.path.display()
            )));
        }

        Ok(())
    }

    /// Permission bits are not available; the file is loaded with a warning
    #[cfg(not(unix))]
    async fn check_permissions(&self) -> Result<(), Error> {
        tracing::warn!(
            "Cannot verify that credential file {} is readable only by its owner on this platform; \
            restrict access to it manually",
            self.path.display()
        );
        Ok(())
    }

    #[cfg(unix)]
    async fn restrict_permissions(path: &Path) -> Result<(), Error> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, std::fs::Permissions::from_mode(OWNER_ONLY_MODE))
            .await
            .map_err(|e| {
                Error::credential_store(format!(
                    "Failed to restrict permissions on {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(_path: &Path) -> Result<(), Error> {
        Ok(())
    }

    /// Write the credential file atomically
    async fn write_file(&self, contents: &CredentialFileFormat) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::credential_store(format!(
                    "Failed to create credential directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(contents)
            .map_err(|e| Error::credential_store(format!("Failed to serialize credentials: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut options = fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(OWNER_ONLY_MODE);

            let mut file = options.open(&temp_path).await.map_err(|e| {
                Error::credential_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            // A leftover temp file keeps its old mode; tighten it before writing.
            Self::restrict_permissions(&temp_path).await?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::credential_store(format!(
                    "Failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::credential_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::credential_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Credentials written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Credentials, Error> {
        if !self.path.exists() {
            return Err(Error::credentials_not_set(format!(
                "no credential file at {}; run `txtctl setcred` first",
                self.path.display()
            )));
        }

        self.check_permissions().await?;

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::credential_store(format!(
                "Failed to read credential file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let file: CredentialFileFormat = serde_json::from_str(&content).map_err(|e| {
            Error::credential_store(format!(
                "Failed to parse credential file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if file.version != CREDENTIAL_FILE_VERSION {
            tracing::warn!(
                "Credential file version mismatch: expected {}, got {}. Attempting to load anyway.",
                CREDENTIAL_FILE_VERSION,
                file.version
            );
        }

        let credentials = Credentials::new(file.username, file.password);
        if !credentials.is_complete() {
            return Err(Error::credentials_not_set(format!(
                "credential file {} is incomplete; run `txtctl setcred` again",
                self.path.display()
            )));
        }

        tracing::debug!(
            "Loaded credentials for '{}' (saved {})",
            credentials.username,
            file.saved_at.to_rfc3339()
        );
        Ok(credentials)
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), Error> {
        if !credentials.is_complete() {
            return Err(Error::invalid_input(
                "username and password must both be non-empty",
            ));
        }

        let contents = CredentialFileFormat {
            version: CREDENTIAL_FILE_VERSION.to_string(),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            saved_at: chrono::Utc::now(),
        };

        self.write_file(&contents).await?;
        tracing::info!("Credentials saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!("Removed credential file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::credential_store(format!(
                "Failed to remove credential file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}
