use std::{io, path::Path};

/// Shows a generated document to the user.
pub trait DocumentLauncher {
    /// An error means the document could not be shown at all.
    fn launch(&self, path: &Path) -> io::Result<()>;
}

/// Opens documents in the default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl DocumentLauncher for SystemBrowser {
    fn launch(&self, path: &Path) -> io::Result<()> {
        utils::browser::open_document(path)
    }
}
