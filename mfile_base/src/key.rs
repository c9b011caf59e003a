//! Track value keys
//! 轨道值键名

/// Input file path / 输入文件路径
pub const INPUT: &str = "input";

/// Output path or template / 输出路径或模板
pub const OUTPUT: &str = "output";

/// Input file size in bytes / 输入文件大小
pub const INPUT_SIZE: &str = "input_size";

/// Logical offset of the last data handed out / 最近输出数据的逻辑偏移
pub const INPUT_OFF: &str = "input_off";

/// Mtime to preserve on output, microseconds since UNIX epoch
/// 输出需保留的修改时间，UNIX 纪元起的微秒数
pub const OUTPUT_TIME: &str = "output_time";

/// Metadata key holding the release date / 发行日期的元数据键
pub const META_DATE: &str = "date";
