//! Embeds build metadata shown by `castdoc --version`.
//!
//! `VERGEN_BUILD_DATE` is always set. Dev builds also get `VERGEN_GIT_SHA`;
//! official builds (`--features release`) leave the hash out.

use std::error::Error;

use vergen_gitcl::{BuildBuilder, Emitter};

fn main() {
    if let Err(e) = emit() {
        // Building outside a git checkout, e.g. from a source tarball.
        println!("cargo:warning=Failed to collect build info: {}", e);
        println!("cargo:rustc-env=VERGEN_BUILD_DATE=unknown");
        #[cfg(not(feature = "release"))]
        println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
    }
}

#[cfg(not(feature = "release"))]
fn emit() -> Result<(), Box<dyn Error>> {
    use vergen_gitcl::GitclBuilder;

    let build = BuildBuilder::default().build_date(true).build()?;
    let git = GitclBuilder::default().sha(true).build()?;
    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&git)?
        .emit()?;
    Ok(())
}

#[cfg(feature = "release")]
fn emit() -> Result<(), Box<dyn Error>> {
    let build = BuildBuilder::default().build_date(true).build()?;
    Emitter::default().add_instructions(&build)?.emit()?;
    Ok(())
}
