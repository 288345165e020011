//! Transfer range and overlap rule
//!
//! 传输范围和重叠规则

use super::bounds;
use super::error::{Error, Result};
use std::ops::Range;

/// A validated block relocation request
///
/// 经过验证的块搬移请求
///
/// Describes two half-open intervals of equal length:
/// - source `[source, source + len)`
/// - destination `[destination, destination + len)`
///
/// 描述两个等长的左闭右开区间：
/// - 源区间 `[source, source + len)`
/// - 目标区间 `[destination, destination + len)`
///
/// # Invariants
///
/// Once constructed through [`TransferRange::new`]:
/// - every offset and the length are below [`SANITY_LIMIT`](super::SANITY_LIMIT)
/// - neither interval ends past the ceiling
/// - the two intervals are disjoint
///
/// # 不变量
///
/// 通过 [`TransferRange::new`] 构造后：
/// - 所有偏移和长度都小于 [`SANITY_LIMIT`](super::SANITY_LIMIT)
/// - 两个区间都不会超过上限
/// - 两个区间互不相交
///
/// A chunked forward copy between intersecting intervals would read bytes that an
/// earlier chunk of the same copy already overwrote, so such requests are refused.
///
/// 在相交区间之间按块正向复制会读到同一次复制中先前块已经覆盖的字节，因此拒绝这类请求。
///
/// # Examples
///
/// ```
/// use durable_file::TransferRange;
///
/// let range = TransferRange::new(0, 4, 4).unwrap();
/// assert_eq!(range.source(), 0..4);
/// assert_eq!(range.destination(), 4..8);
///
/// // [0, 4) and [2, 6) intersect
/// // [0, 4) 与 [2, 6) 相交
/// assert!(TransferRange::new(0, 2, 4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRange {
    source: u32,
    destination: u32,
    len: u32,
}

impl TransferRange {
    /// Validate a transfer of `len` bytes from `source` to `destination`
    ///
    /// 验证从 `source` 到 `destination` 传输 `len` 字节的请求
    ///
    /// # Errors
    /// - `OutOfBounds` (fatal) if any value reaches the ceiling or either interval ends past it
    /// - `OverlappingTransfer` (warning) if the intervals intersect, including
    ///   `source == destination` with `len > 0`
    ///
    /// # Errors
    /// - 任一值达到上限或任一区间超出上限时返回 `OutOfBounds`（致命）
    /// - 区间相交时返回 `OverlappingTransfer`（警告），包括 `source == destination` 且 `len > 0`
    pub fn new(source: u32, destination: u32, len: u32) -> Result<Self> {
        bounds::check("transfer source", source)?;
        bounds::check("transfer destination", destination)?;
        bounds::check("transfer length", len)?;
        bounds::check_end("transfer source end", source, len)?;
        bounds::check_end("transfer destination end", destination, len)?;

        if overlaps(source, destination, len) {
            return Err(Error::OverlappingTransfer {
                source_offset: source,
                destination,
                length: len,
            });
        }

        Ok(Self {
            source,
            destination,
            len,
        })
    }

    /// Source interval
    ///
    /// 源区间
    #[inline]
    pub fn source(&self) -> Range<u32> {
        self.source..self.source + self.len
    }

    /// Destination interval
    ///
    /// 目标区间
    #[inline]
    pub fn destination(&self) -> Range<u32> {
        self.destination..self.destination + self.len
    }

    /// Number of bytes to move
    ///
    /// 要搬移的字节数
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Check if nothing needs to move
    ///
    /// 检查是否无需搬移
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Intersection test for `[source, source + len)` and `[destination, destination + len)`
///
/// 判断 `[source, source + len)` 与 `[destination, destination + len)` 是否相交
///
/// Equal offsets count as overlapping for any non-zero length; the copy would be a
/// no-op, but it is refused rather than special-cased.
///
/// 对任意非零长度，相同偏移视为重叠；这种复制本是空操作，但选择拒绝而非特殊处理。
#[inline]
fn overlaps(source: u32, destination: u32, len: u32) -> bool {
    let (source, destination, len) = (source as u64, destination as u64, len as u64);
    (destination > source && source + len > destination)
        || (destination < source && destination + len > source)
        || (destination == source && len > 0)
}
