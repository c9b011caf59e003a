//! Linux specific implementations

use std::{io, path::Path};

use compio::fs::{File, OpenOptions};
use log::debug;

/// Open for read, direct I/O if asked
/// 只读打开，按需启用直接 I/O
///
/// Filesystems without O_DIRECT answer EINVAL, files not owned by the caller
/// answer EPERM to O_NOATIME: each flag is dropped once and the open retried.
pub async fn open_read(path: &Path, direct: bool) -> io::Result<File> {
  let mut flags = libc::O_NOATIME;
  if direct {
    flags |= libc::O_DIRECT;
  }
  loop {
    match OpenOptions::new().read(true).custom_flags(flags).open(path).await {
      Err(e) if e.raw_os_error() == Some(libc::EINVAL) && flags & libc::O_DIRECT != 0 => {
        debug!("{}: no direct I/O, fall back to buffered", path.display());
        flags &= !libc::O_DIRECT;
      }
      Err(e) if e.raw_os_error() == Some(libc::EPERM) && flags & libc::O_NOATIME != 0 => {
        flags &= !libc::O_NOATIME;
      }
      r => return r,
    }
  }
}
