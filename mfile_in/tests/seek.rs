//! Tests for seeking inside and outside the buffered window
//! 已缓冲窗口内外的定位测试

use std::{path::Path, time::Duration};

use aok::{OK, Void};
use mfile_in::{Conf, Error, Got, NoTrack, ParsedConf, Reader};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn byte(i: usize) -> u8 {
  (i % 251) as u8
}

fn make(path: &Path, size: usize) -> std::io::Result<()> {
  std::fs::write(path, (0..size).map(byte).collect::<Vec<_>>())
}

async fn settle(mut f: impl FnMut() -> bool) {
  for _ in 0..400 {
    if f() {
      return;
    }
    compio::time::sleep(Duration::from_millis(5)).await;
  }
}

async fn open(dir: &Path, size: usize) -> mfile_in::Result<Reader> {
  let path = dir.join("s.bin");
  make(&path, size)?;
  let conf = ParsedConf::parse(&[Conf::BufSize(4096), Conf::BufCount(2), Conf::Align(4096)]);
  Reader::open(path, &conf, NoTrack).await
}

#[compio::test]
async fn test_cheap_seek_forward() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 20000).await?;

  let d = r.next(None).await?.map(|d| (d.off, d.data.len()));
  assert_eq!(d, Some((0, 4096)));
  settle(|| r.buffered() == 4096).await;
  let reads = r.reads();
  assert_eq!(reads, 2);

  let Got::Data(d) = r.get_data(Some(5000))? else {
    panic!("expected data");
  };
  assert_eq!((d.off, d.data.len()), (5000, 3192));
  assert_eq!(d.data[0], byte(5000));
  assert_eq!(r.reads(), reads);

  let d = r.next(None).await?.map(|d| (d.off, d.data.len(), d.data[0]));
  assert_eq!(d, Some((8192, 4096, byte(8192))));
  OK
}

#[compio::test]
async fn test_cheap_seek_backward() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 20000).await?;

  r.next(None).await?;
  settle(|| r.buffered() == 4096).await;
  let reads = r.reads();

  let Got::Data(d) = r.get_data(Some(100))? else {
    panic!("expected data");
  };
  assert_eq!((d.off, d.data.len()), (100, 3996));
  assert_eq!(d.data[0], byte(100));
  assert_eq!(r.reads(), reads);

  let d = r.next(None).await?.map(|d| (d.off, d.data.len()));
  assert_eq!(d, Some((4096, 4096)));
  OK
}

#[compio::test]
async fn test_hard_seek() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 20000).await?;

  r.next(None).await?;
  settle(|| r.buffered() == 4096).await;

  let d = r.next(Some(15000)).await?.map(|d| (d.off, d.data.len(), d.data[0]));
  assert_eq!(d, Some((15000, 1384, byte(15000))));
  let d = r.next(None).await?.map(|d| (d.off, d.data.len(), d.data[0]));
  assert_eq!(d, Some((16384, 3616, byte(16384))));
  assert_eq!(r.next(None).await?, None);
  OK
}

#[compio::test]
async fn test_hard_seek_during_read() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 40000).await?;

  r.next(None).await?;
  // Second read issued, nothing buffered yet
  // 第二次读已发起，尚无缓冲
  assert_eq!(r.reads(), 2);
  assert_eq!(r.buffered(), 0);

  assert!(matches!(r.get_data(Some(30001))?, Got::Suspend));

  let mut first = None;
  let mut got = Vec::new();
  while let Some(d) = r.next(None).await? {
    first.get_or_insert(d.off);
    assert_eq!(d.off, 30001 + got.len() as u64);
    got.extend_from_slice(d.data);
  }
  assert_eq!(first, Some(30001));
  assert_eq!(got, (30001..40000).map(byte).collect::<Vec<_>>());
  OK
}

#[compio::test]
async fn test_seek_before_first_read() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 10000).await?;

  let d = r.next(Some(6000)).await?.map(|d| (d.off, d.data.len(), d.data[0]));
  assert_eq!(d, Some((6000, 2192, byte(6000))));
  let d = r.next(None).await?.map(|d| (d.off, d.data.len()));
  assert_eq!(d, Some((8192, 1808)));
  assert_eq!(r.next(None).await?, None);
  OK
}

#[compio::test]
async fn test_seek_after_done() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 5000).await?;

  while r.next(None).await?.is_some() {}
  assert!(r.is_done());

  let d = r.next(Some(0)).await?.map(|d| (d.off, d.data.len()));
  assert_eq!(d, Some((0, 4096)));
  let d = r.next(None).await?.map(|d| (d.off, d.data.len()));
  assert_eq!(d, Some((4096, 904)));
  OK
}

#[compio::test]
async fn test_seek_out_of_range() -> Void {
  let dir = tempfile::tempdir()?;
  let mut r = open(dir.path(), 10000).await?;

  r.next(None).await?;
  assert_eq!(
    r.get_data(Some(10000)),
    Err(Error::SeekOutOfRange {
      pos: 10000,
      size: 10000
    })
  );

  // not latched, the chunk handed out before is still consumed once
  let d = r.next(None).await?.map(|d| (d.off, d.data.len()));
  assert_eq!(d, Some((4096, 4096)));
  OK
}
