//! Parse option values: sizes with k/m/g suffix and booleans
//! 解析配置值：带 k/m/g 后缀的大小与布尔值

/// Parse "4096", "64k", "1M", "2g" into bytes
/// 解析大小字符串为字节数
pub fn parse_size(s: &str) -> Option<u64> {
  let s = s.trim();
  let (num, shift) = match s.as_bytes().last()? {
    b'k' | b'K' => (&s[..s.len() - 1], 10),
    b'm' | b'M' => (&s[..s.len() - 1], 20),
    b'g' | b'G' => (&s[..s.len() - 1], 30),
    _ => (s, 0),
  };
  num.trim().parse::<u64>().ok()?.checked_mul(1 << shift)
}

/// Parse "1/0", "true/false", "yes/no", "on/off"
/// 解析布尔值
pub fn parse_bool(s: &str) -> Option<bool> {
  match s.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" => Some(false),
    _ => None,
  }
}
