//! Configuration for [`DurableFile`](super::DurableFile)
//!
//! [`DurableFile`](super::DurableFile) 的配置

/// How many zero words [`DurableFile::write_zeros`](super::DurableFile::write_zeros) emits
///
/// [`DurableFile::write_zeros`](super::DurableFile::write_zeros) 写入多少个零字
///
/// Zero fill is emitted in 4-byte words.
///
/// 清零以 4 字节为单位写入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroFill {
    /// Write exactly `length` bytes (`length / 4` words)
    ///
    /// 恰好写入 `length` 字节（`length / 4` 个字）
    #[default]
    Exact,

    /// Write `length + 4` bytes (`length / 4 + 1` words)
    ///
    /// 写入 `length + 4` 字节（`length / 4 + 1` 个字）
    ///
    /// Matches files initialized by older writers whose fill loop bound was inclusive.
    /// Use only when the on-disk layout depends on the extra trailing word.
    ///
    /// 与旧版写入器（循环边界包含终点）初始化的文件保持一致。
    /// 仅当磁盘布局依赖额外的尾部零字时使用。
    TrailingWord,
}

impl ZeroFill {
    /// Number of 4-byte words emitted for a fill of `length` bytes
    ///
    /// 对 `length` 字节的清零请求实际写入的 4 字节字数
    #[inline]
    pub fn words(&self, length: u32) -> u64 {
        let exact = (length / 4) as u64;
        match self {
            ZeroFill::Exact => exact,
            ZeroFill::TrailingWord => exact + 1,
        }
    }
}

/// Options for [`DurableFile`](super::DurableFile)
///
/// [`DurableFile`](super::DurableFile) 的选项
///
/// # Examples
///
/// ```
/// use durable_file::{Options, ZeroFill};
///
/// let options = Options::new().zero_fill(ZeroFill::TrailingWord);
/// assert_eq!(options.zero_fill_policy(), ZeroFill::TrailingWord);
/// assert_eq!(Options::default().zero_fill_policy(), ZeroFill::Exact);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    zero_fill: ZeroFill,
}

impl Options {
    /// Default options
    ///
    /// 默认选项
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero fill policy
    ///
    /// 设置清零策略
    #[inline]
    pub fn zero_fill(mut self, zero_fill: ZeroFill) -> Self {
        self.zero_fill = zero_fill;
        self
    }

    /// Current zero fill policy
    ///
    /// 当前的清零策略
    #[inline]
    pub fn zero_fill_policy(&self) -> ZeroFill {
        self.zero_fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fill_words() {
        assert_eq!(ZeroFill::Exact.words(0), 0);
        assert_eq!(ZeroFill::Exact.words(8), 2);
        assert_eq!(ZeroFill::TrailingWord.words(0), 1);
        assert_eq!(ZeroFill::TrailingWord.words(8), 3);
    }

    #[test]
    fn test_words_do_not_overflow_near_limit() {
        let length = u32::MAX - 3;
        assert_eq!(ZeroFill::TrailingWord.words(length), (length / 4) as u64 + 1);
    }
}
