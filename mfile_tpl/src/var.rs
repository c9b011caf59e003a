//! Built-in variables
//! 内置变量

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use log::debug;
use mfile_base::{Error, Result, Track, key};

use crate::{Val, render};

/// Variable source for one resolution: track plus a single time sample
/// 单次解析的变量来源：轨道与一次取样的时间
pub struct Vars<'a, T: Track + ?Sized> {
  track: &'a T,
  now: Option<NaiveDateTime>,
}

impl<'a, T: Track + ?Sized> Vars<'a, T> {
  pub fn new(track: &'a T) -> Self {
    Self { track, now: None }
  }

  /// Fix the clock / 固定时间
  pub fn with_now(mut self, now: NaiveDateTime) -> Self {
    self.now = Some(now);
    self
  }

  fn now(&mut self) -> NaiveDateTime {
    *self.now.get_or_insert_with(|| Local::now().naive_local())
  }

  fn input(&self) -> Result<String> {
    self
      .track
      .get(key::INPUT)
      .ok_or_else(|| Error::path("no input for $filename/$filepath"))
  }

  /// Value of `name` / 变量 `name` 的值
  pub fn get(&mut self, name: &str) -> Result<Option<Val>> {
    Ok(match name {
      "filename" => {
        let input = self.input()?;
        Path::new(&input)
          .file_stem()
          .map(|s| Val::Name(s.to_string_lossy().into_owned()))
      }
      "filepath" => {
        let input = self.input()?;
        let dir = Path::new(&input)
          .parent()
          .map(|p| p.to_string_lossy().into_owned())
          .unwrap_or_default();
        if dir.is_empty() {
          return Err(Error::path(format!("no directory in input {input}")));
        }
        Some(Val::Raw(dir))
      }
      "date" => Some(Val::Raw(self.now().format("%Y%m%d").to_string())),
      "time" => Some(Val::Raw(self.now().format("%H%M%S").to_string())),
      "timems" => Some(Val::Raw(self.now().format("%H%M%S-%3f").to_string())),
      "year" => self.track.meta(key::META_DATE).map(Val::Name),
      _ => self.track.meta(name).map(Val::Name),
    })
  }

  /// Expand `tpl` / 展开 `tpl`
  pub fn render(&mut self, tpl: &str) -> Result<String> {
    render(tpl, |name| self.get(name))
  }
}

/// Expand `tpl` against `track` with the current local time
/// 以当前本地时间和 `track` 展开 `tpl`
pub fn resolve<T: Track + ?Sized>(tpl: &str, track: &T) -> Result<String> {
  let name = Vars::new(track).render(tpl)?;
  debug!("{tpl} -> {name}");
  Ok(name)
}
