//! Regenerate the FSCV namespace artifact
//!
//! Rebuilds the namespace from its declarations and writes it to the fixed
//! `spec/` directory. Takes no arguments; exits non-zero on a schema
//! authoring error or write failure. Re-running over unchanged declarations
//! rewrites identical content.

use anyhow::Context;
use fscv_store::schema::fscv_namespace;

const OUTPUT_DIR: &str = "spec";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let namespace = fscv_namespace().context("namespace declarations are inconsistent")?;
    namespace
        .export(OUTPUT_DIR)
        .with_context(|| format!("failed to write namespace artifact to {OUTPUT_DIR}/"))?;
    Ok(())
}
