//! Tests for platform helpers
//! 平台工具测试

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aok::{OK, Void};
use compio::{
  fs::{self, OpenOptions},
  io::AsyncWriteAtExt,
};
use mfile_base::os;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[compio::test]
async fn test_open_read_direct() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("a.bin");
  fs::write(&path, vec![7u8; 8192]).await.0?;

  for direct in [true, false] {
    let file = os::open_read(&path, direct).await?;
    assert_eq!(file.metadata().await?.len(), 8192);
  }
  OK
}

#[compio::test]
async fn test_open_read_missing() -> Void {
  let dir = tempfile::tempdir()?;
  let r = os::open_read(&dir.path().join("none"), true).await;
  assert_eq!(r.err().map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
  OK
}

#[compio::test]
async fn test_truncate() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("t.bin");
  let mut file = OpenOptions::new()
    .write(true)
    .create(true)
    .open(&path)
    .await?;
  file.write_all_at(vec![1u8; 100], 0).await.0?;

  os::truncate(&file, 4096)?;
  assert_eq!(file.metadata().await?.len(), 4096);

  os::truncate(&file, 10)?;
  assert_eq!(file.metadata().await?.len(), 10);
  OK
}

#[compio::test]
async fn test_set_mtime() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("m.bin");
  let file = OpenOptions::new()
    .write(true)
    .create(true)
    .open(&path)
    .await?;

  let t = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
  os::set_mtime(&file, t)?;
  drop(file);

  let got = std::fs::metadata(&path)?.modified()?;
  assert_eq!(got.duration_since(UNIX_EPOCH)?.as_secs(), 1_000_000_000);
  assert!(got < SystemTime::now());
  OK
}
