use std::{fs, path::Path};

use anyhow::{Context, Result};
use solomachine_light_client::{crypto::KeyScheme, signer::SoloMachineSigner};

/// Reads a hex encoded 32 byte secret key, with or without `0x` prefix.
pub fn read_signer(path: &Path, scheme: KeyScheme) -> Result<SoloMachineSigner> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key from {}", path.display()))?;
    let secret = hex::decode(contents.trim().trim_start_matches("0x"))
        .with_context(|| format!("Key file {} is not hex encoded", path.display()))?;
    SoloMachineSigner::from_secret_bytes(scheme, &secret)
        .with_context(|| format!("Invalid {scheme} secret key in {}", path.display()))
}
