//! Drive a reader into a writer / 将读取器的数据写入写入器

use log::debug;
use mfile_base::{Result, Track};
use mfile_in::Reader;
use mfile_out::{Opt, Writer};

/// Move everything left in `reader` to `writer` and finalize it
/// 将 `reader` 剩余数据全部写入 `writer` 并完成
pub async fn pipe<T: Track + 'static>(reader: &mut Reader<T>, writer: &mut Writer) -> Result<u64> {
  let mut total = 0;
  while let Some(d) = reader.next(None).await? {
    writer.write(d.data, false).await?;
    total += d.data.len() as u64;
  }
  writer.write(&[], true).await?;
  Ok(total)
}

/// Copy the track's `input` to the file named by `tpl`
/// 将轨道的 `input` 复制到 `tpl` 指定的文件
///
/// The output is preallocated to the input size unless `opt` says otherwise.
/// An error leaves the output to the writer's abort policy.
/// 除非 `opt` 另有指定，输出按输入大小预分配。出错时输出文件按写入器的中止策略处理。
pub async fn copy<T: Track + Clone + 'static>(
  track: T,
  tpl: &str,
  in_conf: &mfile_in::ParsedConf,
  out_conf: &mfile_out::ParsedConf,
  mut opt: Opt,
) -> Result<u64> {
  let mut reader = Reader::open_input(in_conf, track.clone()).await?;
  if opt.size.is_none() {
    opt.size = Some(reader.size());
  }
  let mut writer = Writer::open(tpl, &track, out_conf, opt).await?;
  let n = pipe(&mut reader, &mut writer).await?;
  debug!(
    "{} -> {}: {n} bytes",
    reader.path().display(),
    writer.path().display()
  );
  reader.close();
  writer.close();
  Ok(n)
}
