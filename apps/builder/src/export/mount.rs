use std::io;
use std::path::PathBuf;

use tempfile::TempDir;
use tracing::{debug, warn};

const DOCUMENT_NAME: &str = "index.html";

/// The standalone document written somewhere the rasterizer can load it but the
/// user never sees. Removed by `unmount`, or on drop if unmount is never reached.
pub struct OffscreenMount {
    dir: TempDir,
}

impl OffscreenMount {
    pub async fn mount(html: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("resume-export-")
            .tempdir()?;
        tokio::fs::write(dir.path().join(DOCUMENT_NAME), html).await?;
        debug!("Mounted export document in {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join(DOCUMENT_NAME)
    }

    pub fn unmount(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("Failed to remove export mount {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mount_writes_and_unmount_removes() {
        let mount = OffscreenMount::mount("<p>hi</p>").await.unwrap();
        let path = mount.document_path();
        let dir = path.parent().unwrap().to_path_buf();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<p>hi</p>"
        );
        mount.unmount();
        assert!(!dir.exists());
    }
}
