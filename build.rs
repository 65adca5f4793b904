// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Client stubs only.
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .bytes(["."])
        .compile_protos(&["proto/api/v2/files.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/api/v2/files.proto");
    Ok(())
}
