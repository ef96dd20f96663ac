//! Build script for setlistcli.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory, next to where the binary looks for its `.env`:
//! - Linux: `~/.local/share/setlistcli/.env.example`
//! - macOS: `~/Library/Application Support/setlistcli/.env.example`
//! - Windows: `%LOCALAPPDATA%/setlistcli/.env.example`

use std::{env, fs, path::PathBuf};

/// A missing template only produces a cargo warning; failing to create the
/// directory or to write the copy fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("setlistcli");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
