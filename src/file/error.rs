//! Error types for durable-file
//!
//! durable-file 的错误类型

use std::fmt;
use std::io;

/// Severity class of a failure
///
/// 失败的严重级别
///
/// - [`Severity::Fatal`]: the caller broke the contract (bad offset, bad length,
///   buffer too small). Detected before any I/O, so the file is untouched.
/// - [`Severity::Warning`]: the storage layer failed, or a transfer was refused.
///   The caller may retry or abort the larger operation.
///
/// - [`Severity::Fatal`]：调用方违反约定（偏移、长度或缓冲区错误），在任何 I/O 之前检测，文件未被修改。
/// - [`Severity::Warning`]：存储层失败或传输被拒绝，调用方可以重试或放弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Caller contract violation
    ///
    /// 调用方违反约定
    Fatal,

    /// Operational failure
    ///
    /// 运行期失败
    Warning,
}

impl Severity {
    /// Lowercase name used in log fields
    ///
    /// 日志字段中使用的小写名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The storage-layer step that failed
///
/// 失败的存储层步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoStep {
    /// Repositioning the cursor
    Seek,
    /// Reading bytes
    Read,
    /// Writing bytes
    Write,
    /// Flushing in-process buffers
    Flush,
    /// Forcing data to storage
    Sync,
    /// Querying metadata
    Stat,
    /// Resizing the file
    Truncate,
}

impl IoStep {
    /// Lowercase name of the step
    ///
    /// 步骤的小写名称
    pub fn as_str(&self) -> &'static str {
        match self {
            IoStep::Seek => "seek",
            IoStep::Read => "read",
            IoStep::Write => "write",
            IoStep::Flush => "flush",
            IoStep::Sync => "sync",
            IoStep::Stat => "stat",
            IoStep::Truncate => "truncate",
        }
    }
}

impl fmt::Display for IoStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for durable-file operations
///
/// durable-file 操作的错误类型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value reached the sanity ceiling
    ///
    /// 数值达到了安全上限
    #[error("{what} {value} exceeds sanity hard limit {limit} / {what} {value} 超出安全上限 {limit}")]
    OutOfBounds {
        what: &'static str,
        value: u64,
        limit: u64,
    },

    /// Caller buffer cannot hold `offset + length` bytes
    ///
    /// 调用方缓冲区无法容纳 `offset + length` 字节
    #[error("Buffer length {buffer_len} is smaller than offset {offset} + length {length} / 缓冲区长度 {buffer_len} 小于偏移 {offset} + 长度 {length}")]
    BufferTooSmall {
        buffer_len: usize,
        offset: u32,
        length: u32,
    },

    /// Zero fill length is not a whole number of 4-byte words
    ///
    /// 清零长度不是 4 字节的整数倍
    #[error("Zero fill length must be a multiple of 4 bytes, got {length} / 清零长度必须是 4 字节的整数倍，实际为 {length}")]
    UnalignedZeroFill { length: u32 },

    /// Transfer source and destination intersect
    ///
    /// 传输的源区间和目标区间相交
    #[error("Can't transfer between overlapping parts of file: src={source_offset} dest={destination} len={length} / 无法在重叠区域之间传输")]
    OverlappingTransfer {
        source_offset: u32,
        destination: u32,
        length: u32,
    },

    /// Fewer bytes were available than requested
    ///
    /// 可读字节数少于请求的字节数
    #[error("Short read: expected {expected} bytes, got {actual} / 读取不足：期望 {expected} 字节，实际 {actual} 字节")]
    ShortRead { expected: usize, actual: usize },

    /// The handle accepted fewer bytes than requested
    ///
    /// 句柄接受的字节数少于请求的字节数
    #[error("Short write: expected {expected} bytes, wrote {actual} / 写入不足：期望 {expected} 字节，实际 {actual} 字节")]
    ShortWrite { expected: usize, actual: usize },

    /// A transfer stopped part way; bytes before `source_offset`/`destination` were moved
    ///
    /// 传输中途停止；`source_offset`/`destination` 之前的字节已搬移
    #[error("Transfer interrupted at src={source_offset} dest={destination} remaining={remaining}: {cause}")]
    TransferInterrupted {
        source_offset: u32,
        destination: u32,
        remaining: u32,
        #[source]
        cause: Box<Error>,
    },

    /// The storage layer failed
    ///
    /// 存储层失败
    #[error("I/O error during {step}: {source}")]
    Io {
        step: IoStep,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Severity class of this error
    ///
    /// 该错误的严重级别
    pub fn severity(&self) -> Severity {
        match self {
            Error::OutOfBounds { .. } | Error::BufferTooSmall { .. } | Error::UnalignedZeroFill { .. } => {
                Severity::Fatal
            }
            Error::OverlappingTransfer { .. }
            | Error::ShortRead { .. }
            | Error::ShortWrite { .. }
            | Error::Io { .. } => Severity::Warning,
            Error::TransferInterrupted { cause, .. } => cause.severity(),
        }
    }

    /// `true` if this is a caller contract violation
    ///
    /// 是否为调用方违反约定
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// The failed storage step, if any
    ///
    /// 失败的存储步骤（如有）
    pub fn io_step(&self) -> Option<IoStep> {
        match self {
            Error::Io { step, .. } => Some(*step),
            Error::TransferInterrupted { cause, .. } => cause.io_step(),
            _ => None,
        }
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            Error::Io { source, .. } => source.kind(),
            Error::ShortRead { .. } => io::ErrorKind::UnexpectedEof,
            Error::ShortWrite { .. } => io::ErrorKind::WriteZero,
            Error::TransferInterrupted { cause, .. } => cause.io_kind(),
            Error::OutOfBounds { .. }
            | Error::BufferTooSmall { .. }
            | Error::UnalignedZeroFill { .. }
            | Error::OverlappingTransfer { .. } => io::ErrorKind::InvalidInput,
        }
    }

    /// Adapter for `map_err` that tags an `io::Error` with the step that produced it
    ///
    /// 用于 `map_err` 的适配器，为 `io::Error` 标记产生它的步骤
    #[inline]
    pub(crate) fn at(step: IoStep) -> impl FnOnce(io::Error) -> Error {
        move |source| Error::Io { step, source }
    }
}

/// Convert from Error to io::Error for compatibility
///
/// 从 Error 转换到 io::Error 以保持兼容性
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io { source, .. } => source,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}

/// Result type alias using our custom Error type
///
/// 使用自定义 Error 类型的 Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classes() {
        let fatal = [
            Error::OutOfBounds { what: "length", value: 1 << 31, limit: 1 << 31 },
            Error::BufferTooSmall { buffer_len: 2, offset: 1, length: 4 },
            Error::UnalignedZeroFill { length: 6 },
        ];
        for err in fatal {
            assert_eq!(err.severity(), Severity::Fatal, "{err}");
            assert!(err.is_fatal());
        }

        let warning = [
            Error::OverlappingTransfer { source_offset: 0, destination: 2, length: 4 },
            Error::ShortRead { expected: 4, actual: 1 },
            Error::ShortWrite { expected: 4, actual: 0 },
            Error::Io { step: IoStep::Sync, source: io::Error::other("disk gone") },
        ];
        for err in warning {
            assert_eq!(err.severity(), Severity::Warning, "{err}");
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn test_display_carries_values() {
        let err = Error::OverlappingTransfer { source_offset: 0, destination: 2, length: 4 };
        let msg = err.to_string();
        assert!(msg.contains("src=0 dest=2 len=4"), "{msg}");

        let err = Error::OutOfBounds { what: "seek position", value: 1 << 31, limit: 1 << 31 };
        assert!(err.to_string().starts_with("seek position 2147483648 exceeds sanity hard limit 2147483648"));
    }

    #[test]
    fn test_into_io_error_kinds() {
        let io_err: io::Error = Error::ShortRead { expected: 4, actual: 0 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);

        let io_err: io::Error = Error::ShortWrite { expected: 4, actual: 0 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);

        let io_err: io::Error = Error::UnalignedZeroFill { length: 3 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);

        let io_err: io::Error = Error::Io {
            step: IoStep::Flush,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_transfer_interrupted_delegates_to_cause() {
        let err = Error::TransferInterrupted {
            source_offset: 4096,
            destination: 20480,
            remaining: 100,
            cause: Box::new(Error::Io {
                step: IoStep::Write,
                source: io::Error::other("no space"),
            }),
        };
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.io_step(), Some(IoStep::Write));
        assert!(err.to_string().contains("src=4096 dest=20480 remaining=100"));

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert!(io_err.to_string().contains("no space"));
    }
}
