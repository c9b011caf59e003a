//! Unix implementations shared by Linux and macOS

use std::{
  io,
  os::fd::AsRawFd,
  time::{SystemTime, UNIX_EPOCH},
};

use compio::fs::File;

/// Set file length, extending with zeros or cutting the tail
/// 设置文件长度，扩展补零或截掉尾部
pub fn truncate(file: &File, len: u64) -> io::Result<()> {
  let len = libc::off_t::try_from(len).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
  if unsafe { libc::ftruncate(file.as_raw_fd(), len) } == -1 {
    return Err(io::Error::last_os_error());
  }
  Ok(())
}

/// Set modification time, access time untouched
/// 设置修改时间，访问时间不变
pub fn set_mtime(file: &File, t: SystemTime) -> io::Result<()> {
  let d = t
    .duration_since(UNIX_EPOCH)
    .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
  let times = [
    libc::timespec {
      tv_sec: 0,
      tv_nsec: libc::UTIME_OMIT,
    },
    libc::timespec {
      tv_sec: d.as_secs() as libc::time_t,
      tv_nsec: d.subsec_nanos() as _,
    },
  ];
  if unsafe { libc::futimens(file.as_raw_fd(), times.as_ptr()) } == -1 {
    return Err(io::Error::last_os_error());
  }
  Ok(())
}
