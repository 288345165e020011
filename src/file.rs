//! Durable file I/O over an already-open handle
//!
//! 基于已打开句柄的持久化文件 I/O
//!
//! Provides:
//! - [`DurableFile`]: positioned reads and writes, length control, zero fill and
//!   in-file block relocation, each write ending in a flush + sync barrier
//! - [`FileHandle`]: the storage seam, implemented for [`std::fs::File`] and
//!   in-memory cursors
//! - [`TransferRange`]: a validated, non-overlapping relocation request
//! - [`Diagnostics`]: where failures are reported before they are returned
//!
//! 提供：
//! - [`DurableFile`]：定位读写、长度控制、清零和文件内块搬移，每次写入都以 flush + sync 屏障结束
//! - [`FileHandle`]：存储层接口，已为 [`std::fs::File`] 和内存游标实现
//! - [`TransferRange`]：经过验证、互不重叠的搬移请求
//! - [`Diagnostics`]：失败在返回之前的报告去处
//!
//! # Failure Classes
//!
//! Argument errors (offsets at or past [`SANITY_LIMIT`], buffers too small, unaligned
//! zero fill) are fatal-class and never touch the handle. Storage failures and refused
//! transfers are warning-class. See [`Severity`].
//!
//! # 失败分类
//!
//! 参数错误（偏移达到或超过 [`SANITY_LIMIT`]、缓冲区过小、清零长度未对齐）属于致命级，
//! 不会访问句柄。存储层失败和被拒绝的传输属于警告级。参见 [`Severity`]。
//!
//! ```
//! # use durable_file::{DurableFile, Error, Severity};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut file = DurableFile::new(tempfile::tempfile()?);
//!
//! // Overlapping ranges are refused before any I/O
//! // 重叠区间在任何 I/O 之前被拒绝
//! let err = file.transfer_to(0, 2, 4).unwrap_err();
//! assert!(matches!(err, Error::OverlappingTransfer { .. }));
//! assert_eq!(err.severity(), Severity::Warning);
//!
//! // Zero fill works in whole 4-byte words
//! // 清零以完整的 4 字节字为单位
//! let err = file.write_zeros(6).unwrap_err();
//! assert!(err.is_fatal());
//! # Ok(())
//! # }
//! ```

mod bounds;
mod diagnostics;
mod durable_file;
mod error;
mod handle;
mod options;
mod range;


// Re-export public API
// 重新导出公共 API
pub use bounds::SANITY_LIMIT;
pub use diagnostics::{Diagnostic, Diagnostics, NoopDiagnostics, Operation, TracingDiagnostics};
pub use durable_file::{COPY_BUFFER_SIZE, DurableFile};
pub use error::{Error, IoStep, Result, Severity};
pub use handle::FileHandle;
pub use options::{Options, ZeroFill};
pub use range::TransferRange;
