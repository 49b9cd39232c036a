//! Signed-in user identity, persisted across sessions
//!
//! The record is stored as a single JSON document under the `user-storage`
//! key, in the same `{"state": {...}, "version": 0}` envelope the web
//! client writes, so both can share one file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{IdentityError, Result};

/// Storage key of the identity record
pub const STORAGE_KEY: &str = "user-storage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    JobSeeker,
    Recruiter,
    Company,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::JobSeeker => "Job seeker",
            Role::Recruiter => "Recruiter",
            Role::Company => "Company",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub user_name: String,
    pub user_role: Role,
    #[serde(default)]
    pub user_image: Option<String>,
}

impl Identity {
    /// Short label for title bars: "Name (Role)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.user_name, self.user_role)
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: Identity,
    #[serde(default)]
    version: u32,
}

/// File-backed identity store
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored identity
    ///
    /// A missing file means nobody is signed in. A corrupted file is logged
    /// and treated the same way.
    pub fn load(&self) -> Result<Option<Identity>> {
        if !self.path.exists() {
            debug!("No identity record at {}", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(IdentityError::Io)?;
        match serde_json::from_str::<Envelope>(&content) {
            Ok(envelope) => Ok(Some(envelope.state)),
            Err(e) => {
                warn!(
                    "Corrupted identity record at {}, ignoring: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// Persist the identity, replacing any previous record
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// target, so readers never see a partial record.
    pub fn save(&self, identity: &Identity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(IdentityError::Io)?;
        }

        let envelope = Envelope {
            state: identity.clone(),
            version: 0,
        };
        let content = serde_json::to_string(&envelope).map_err(IdentityError::Malformed)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(IdentityError::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .map_err(IdentityError::Io)?;
        }

        std::fs::rename(&tmp, &self.path).map_err(IdentityError::Io)?;
        debug!("Saved identity for {}", identity.user_id);
        Ok(())
    }

    /// Forget the signed-in user
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IdentityError::Io(e).into()),
        }
    }
}
