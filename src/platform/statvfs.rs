// Inode counts via statvfs(3)
use std::path::Path;

use crate::core::health::InodeSample;

/// Inode totals for the filesystem mounted at `path`.
///
/// `None` when the call fails or the filesystem reports no inode table
/// (btrfs and some network filesystems report zero).
#[cfg(unix)]
pub fn inode_usage(path: &Path) -> Option<InodeSample> {
    let stat = match nix::sys::statvfs::statvfs(path) {
        Ok(stat) => stat,
        Err(error) => {
            log::debug!("statvfs({}) failed: {}", path.display(), error);
            return None;
        }
    };

    #[allow(clippy::unnecessary_cast)]
    let (total, free) = (stat.files() as u64, stat.files_free() as u64);
    if total == 0 {
        return None;
    }
    Some(InodeSample { total, free })
}

#[cfg(not(unix))]
pub fn inode_usage(_path: &Path) -> Option<InodeSample> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_has_no_inodes() {
        assert!(inode_usage(Path::new("/this/path/does/not/exist/at/all")).is_none());
    }

    #[test]
    fn test_free_never_exceeds_total() {
        if let Some(inodes) = inode_usage(Path::new("/")) {
            assert!(inodes.free <= inodes.total);
        }
    }
}
