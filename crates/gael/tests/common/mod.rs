//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use indoc::indoc;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// A system document mixing canonical, bold and bullet dialects.
pub const SYSTEM_DOC: &str = indoc! {"
    # 01 — System Foundation

    Firmware, bootloaders and kernels.

    ## Firmware

    ### coreboot → `coreboot`
    Open-source firmware.
    - **Build**: `make crossgcc-i386 && make`
    - **Docs**: https://doc.coreboot.org

    ### **GRUB** → `grub-fork` (fork of `grub`)
    The GNU bootloader.
    - **Build**: ./bootstrap && make

    ## Kernels

    - `linux` — the kernel
    - `freebsd` — another kernel
"};

/// A tooling document written as a table.
pub const TOOLS_DOC: &str = indoc! {"
    # 02 — Developer Tools

    ## Editors

    | Fork | What it does | Upstream |
    |------|--------------|----------|
    | `me/helix` | Modal editor | `helix-editor/helix` |
    | `me/kakoune` | Selection-first editor | `mawww/kakoune` |
"};

/// Path to the compiled `gael` binary.
pub fn gael_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gael"))
}

/// Run the gael binary in the specified directory with colors disabled.
pub fn run_gael_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(gael_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute gael binary")
}

/// Write the sample documents into `<dir>/docs`.
pub fn write_sample_docs(dir: &Path) -> PathBuf {
    let docs = dir.join("docs");
    std::fs::create_dir_all(&docs).expect("Failed to create docs dir");
    std::fs::write(docs.join("01-system.md"), SYSTEM_DOC).expect("Failed to write doc");
    std::fs::write(docs.join("02-tools.md"), TOOLS_DOC).expect("Failed to write doc");
    docs
}

/// Parse stdout as JSON, failing the test with stderr on error.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}
