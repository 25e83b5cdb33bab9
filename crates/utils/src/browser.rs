use std::path::Path;

/// Opens a local document in the user's default browser.
///
/// Fails when no browser could be launched (headless hosts, missing opener);
/// callers treat this like a blocked popup.
pub fn open_document(path: &Path) -> std::io::Result<()> {
    tracing::debug!(path = %path.display(), "opening document in browser");
    open::that_detached(path)
}
