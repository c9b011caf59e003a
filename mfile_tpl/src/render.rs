//! Template scanner
//! 模板扫描

use mfile_base::{Error, Result};

use crate::sanitize_into;

/// Variable value / 变量值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Val {
  /// Inserted as is (directory paths) / 原样插入（目录路径）
  Raw(String),
  /// Sanitized as a file name component / 按文件名清洗
  Name(String),
}

#[inline]
fn is_name(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_'
}

/// Expand `tpl`, asking `lookup` for each variable
/// 展开 `tpl`，每个变量调用 `lookup`
///
/// `Ok(None)` from `lookup` substitutes nothing.
/// `lookup` 返回 `Ok(None)` 时替换为空。
pub fn render(tpl: &str, mut lookup: impl FnMut(&str) -> Result<Option<Val>>) -> Result<String> {
  let b = tpl.as_bytes();
  let mut out = String::with_capacity(tpl.len());
  let mut i = 0;
  while i < b.len() {
    let Some(n) = tpl[i..].find('$') else {
      out.push_str(&tpl[i..]);
      break;
    };
    out.push_str(&tpl[i..i + n]);
    i += n + 1;

    let name = match b.get(i) {
      Some(b'$') => {
        out.push('$');
        i += 1;
        continue;
      }
      Some(b'{') => {
        let start = i + 1;
        let Some(len) = tpl[start..].find('}') else {
          return Err(Error::path(format!("unclosed ${{ in {tpl}")));
        };
        let name = &tpl[start..start + len];
        if name.is_empty() || !name.bytes().all(is_name) {
          return Err(Error::path(format!("bad variable ${{{name}}} in {tpl}")));
        }
        i = start + len + 1;
        name
      }
      Some(&c) if is_name(c) => {
        let start = i;
        while i < b.len() && is_name(b[i]) {
          i += 1;
        }
        &tpl[start..i]
      }
      _ => return Err(Error::path(format!("dangling $ in {tpl}"))),
    };

    match lookup(name)? {
      Some(Val::Raw(v)) => out.push_str(&v),
      Some(Val::Name(v)) => sanitize_into(&mut out, &v),
      None => {}
    }
  }
  Ok(out)
}
