//! macOS specific implementations

use std::{io, os::fd::AsRawFd, path::Path};

use compio::fs::{File, OpenOptions};
use log::debug;

/// Open for read, F_NOCACHE stands in for direct I/O
/// 只读打开，用 F_NOCACHE 代替直接 I/O
pub async fn open_read(path: &Path, direct: bool) -> io::Result<File> {
  let file = OpenOptions::new().read(true).open(path).await?;
  if direct && unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) } == -1 {
    debug!(
      "{}: F_NOCACHE: {}",
      path.display(),
      io::Error::last_os_error()
    );
  }
  Ok(file)
}
