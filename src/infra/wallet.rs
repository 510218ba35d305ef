//! Custodial credential: the service's own signing key, persisted as a Solana keypair file
//! (JSON array of the 64 secret key bytes).

use anyhow::Context;
use solana_sdk::signer::keypair::{read_keypair_file, write_keypair_file, Keypair};
use solana_sdk::signer::Signer;
use solana_program::pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct CustodialWallet {
    keypair: Arc<Keypair>,
    path: PathBuf,
    created: bool,
}

impl CustodialWallet {
    /// Loads the keypair at `path`, generating and persisting a new one if the file is absent.
    ///
    /// An existing file that cannot be parsed is an error; it is never overwritten.
    pub fn load_or_create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            let keypair = read_keypair_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read keypair file {}: {}", path.display(), e))?;
            tracing::info!(pubkey = %keypair.pubkey(), path = %path.display(), "loaded custodial wallet");
            return Ok(Self {
                keypair: Arc::new(keypair),
                path,
                created: false,
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create wallet directory {}", parent.display()))?;
        }

        let keypair = Keypair::new();
        write_keypair_file(&keypair, &path)
            .map_err(|e| anyhow::anyhow!("Failed to write keypair file {}: {}", path.display(), e))?;
        tracing::info!(pubkey = %keypair.pubkey(), path = %path.display(), "generated custodial wallet");

        Ok(Self {
            keypair: Arc::new(keypair),
            path,
            created: true,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when this process generated the credential.
    pub fn created(&self) -> bool {
        self.created
    }
}
