// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use fairplay_kernel::commitment::verify_commitment;

use crate::reveal::RevealFile;

pub fn run(reveal_path: &Path) -> anyhow::Result<()> {
    let file = RevealFile::load(reveal_path)?;
    match verify_commitment(&file.server_secret, &file.secret_hash) {
        Ok(()) => {
            println!("\n✅ COMMITMENT VERIFIED\n");
            println!("Secret Hash: {}", file.secret_hash.to_ascii_lowercase());
            Ok(())
        }
        Err(e) => {
            println!("\n❌ COMMITMENT MISMATCH\n");
            if let (Some(expected), Some(actual)) = (e.detail.get("expected"), e.detail.get("actual")) {
                println!("Committed: {}", expected);
                println!("Computed:  {}", actual);
            }
            Err(e.into())
        }
    }
}
