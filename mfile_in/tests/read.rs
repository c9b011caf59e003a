//! Tests for sequential reading
//! 顺序读取测试

use std::{path::Path, rc::Rc, time::Duration, time::UNIX_EPOCH};

use aok::{OK, Void};
use mfile_base::key;
use mfile_in::{Conf, Got, MemTrack, NoTrack, ParsedConf, Reader, Track};

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

fn small() -> ParsedConf {
  ParsedConf::parse(&[Conf::BufSize(4096), Conf::BufCount(2), Conf::Align(4096)])
}

#[compio::test]
async fn test_chunks() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("a.bin");
  make(&path, 10000)?;

  let mut r = Reader::open(&path, &small(), NoTrack).await?;
  let mut got = vec![];
  while let Some(d) = r.next(None).await? {
    assert_eq!(d.data[0], byte(d.off as usize));
    got.push((d.off, d.data.len()));
  }
  assert_eq!(got, [(0, 4096), (4096, 4096), (8192, 1808)]);
  assert!(r.is_done());
  assert_eq!(r.reads(), 3);
  assert_eq!(r.next(None).await?, None);
  OK
}

#[compio::test]
async fn test_empty_file() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("empty");
  make(&path, 0)?;

  let mut r = Reader::open(&path, &small(), NoTrack).await?;
  assert_eq!(r.next(None).await?, None);
  assert!(r.is_done());
  OK
}

#[compio::test]
async fn test_exact_multiple() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("b.bin");
  make(&path, 8192)?;

  let mut r = Reader::open(&path, &small(), NoTrack).await?;
  let mut total = 0;
  while let Some(d) = r.next(None).await? {
    assert_eq!(d.data.len(), 4096);
    total += d.data.len();
  }
  assert_eq!(total, 8192);
  OK
}

#[compio::test]
async fn test_suspend_wake() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("c.bin");
  make(&path, 6000)?;

  let track = Rc::new(MemTrack::new());
  let mut r = Reader::open(&path, &small(), track.clone()).await?;
  assert_eq!(track.get(key::INPUT_SIZE).as_deref(), Some("6000"));

  assert_eq!(r.get_data(None)?, Got::Suspend);
  settle(|| track.wakes() > 0).await;
  settle(|| r.is_done()).await;
  assert_eq!(track.wakes(), 1);

  let Got::Data(d) = r.get_data(None)? else {
    panic!("expected data");
  };
  assert_eq!((d.off, d.data.len()), (0, 4096));
  assert_eq!(track.get(key::INPUT_OFF).as_deref(), Some("0"));

  let Got::Data(d) = r.get_data(None)? else {
    panic!("expected data");
  };
  assert_eq!((d.off, d.data.len()), (4096, 1904));
  assert_eq!(track.get(key::INPUT_OFF).as_deref(), Some("4096"));

  assert_eq!(r.get_data(None)?, Got::Done);
  assert_eq!(r.get_data(None)?, Got::Done);
  OK
}

#[compio::test]
async fn test_preserve_mtime() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("d.bin");
  make(&path, 10)?;
  let mtime = std::fs::metadata(&path)?.modified()?;

  let track = Rc::new(MemTrack::new());
  let conf = ParsedConf::parse(&[Conf::PreserveMtime(true)]);
  let _r = Reader::open(&path, &conf, track.clone()).await?;
  let want = mtime.duration_since(UNIX_EPOCH)?.as_micros().to_string();
  assert_eq!(track.get(key::OUTPUT_TIME), Some(want));

  let track = Rc::new(MemTrack::new());
  let _r = Reader::open(&path, &ParsedConf::default(), track.clone()).await?;
  assert_eq!(track.get(key::OUTPUT_TIME), None);
  OK
}

#[compio::test]
async fn test_open_input() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("e.bin");
  make(&path, 300)?;

  let track = MemTrack::new().with_val(key::INPUT, path.to_string_lossy());
  let mut r = Reader::open_input(&ParsedConf::default(), track).await?;
  let d = r.next(None).await?.map(|d| d.data.to_vec());
  assert_eq!(d, Some((0..300).map(byte).collect()));

  assert!(matches!(
    Reader::open_input(&ParsedConf::default(), MemTrack::new()).await,
    Err(mfile_in::Error::PathResolution(_))
  ));
  OK
}

mod prop {
  use mfile_in::{Conf, NoTrack, ParsedConf, Reader};
  use proptest::prelude::*;

  use super::{byte, make};

  /// Chunks concatenate to the file, offsets are contiguous
  /// 数据块拼接即为文件内容，偏移连续
  fn prop_concat(size: usize, pages: usize, count: usize) {
    compio::runtime::Runtime::new().unwrap().block_on(async {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("p.bin");
      make(&path, size).unwrap();

      let conf = ParsedConf::parse(&[
        Conf::BufSize(pages * 512),
        Conf::BufCount(count),
        Conf::Align(512),
        Conf::DirectIo(false),
      ]);
      let mut r = Reader::open(&path, &conf, NoTrack).await.unwrap();
      let mut all = Vec::with_capacity(size);
      while let Some(d) = r.next(None).await.unwrap() {
        assert!(!d.data.is_empty());
        assert_eq!(d.off, all.len() as u64);
        all.extend_from_slice(d.data);
      }
      assert_eq!(all.len(), size);
      assert!(all.iter().enumerate().all(|(i, &b)| b == byte(i)));
    });
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_prop_concat(size in 0usize..40000, pages in 1usize..9, count in 1usize..5) {
      prop_concat(size, pages, count);
    }
  }
}
