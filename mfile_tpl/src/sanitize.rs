/// Whether `c` cannot appear in a file name component
/// `c` 是否不能出现在文件名中
#[inline]
fn bad(c: char) -> bool {
  matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

/// Append `s` to `out`, replacing characters invalid in a file name with `_`
/// 追加 `s` 到 `out`，文件名非法字符替换为 `_`
pub fn sanitize_into(out: &mut String, s: &str) {
  out.reserve(s.len());
  for c in s.chars() {
    out.push(if bad(c) { '_' } else { c });
  }
}

/// Replace characters invalid in a file name with `_`
/// 文件名非法字符替换为 `_`
pub fn sanitize(s: &str) -> String {
  let mut out = String::new();
  sanitize_into(&mut out, s);
  out
}
