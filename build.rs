use vergen_gitcl::{Emitter, Gitcl};

// Git branch, SHA and dirty flag for `version.rs`. Outside a checkout vergen
// emits nothing and the constants fall back to "unknown".
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let git = Gitcl::builder().branch(true).sha(true).dirty(true).build();
    Emitter::default().add_instructions(&git)?.emit()?;
    Ok(())
}
