//! Sanity ceiling for offsets and lengths
//!
//! 偏移量和长度的安全上限

use super::error::{Error, Result};

/// Hard ceiling for any single offset or length (2 GiB)
///
/// 任意单个偏移量或长度的硬上限（2 GiB）
///
/// Values `>= SANITY_LIMIT` are rejected before the handle is touched. This catches
/// caller bugs such as a negative value reinterpreted as a huge unsigned magnitude.
///
/// `>= SANITY_LIMIT` 的值会在访问句柄之前被拒绝，用于捕获诸如负数被解释为巨大无符号数之类的调用方错误。
pub const SANITY_LIMIT: u32 = 1 << 31;

/// Reject `value` if it reaches the ceiling
///
/// 如果 `value` 达到上限则拒绝
#[inline]
pub(crate) fn check(what: &'static str, value: u32) -> Result<()> {
    if value >= SANITY_LIMIT {
        return Err(Error::OutOfBounds {
            what,
            value: value as u64,
            limit: SANITY_LIMIT as u64,
        });
    }
    Ok(())
}

/// Reject a half-open range `[start, start + length)` whose end lies past the ceiling
///
/// 拒绝结束位置超出上限的左闭右开区间 `[start, start + length)`
///
/// The end itself may equal the ceiling, since the last byte addressed is `end - 1`.
#[inline]
pub(crate) fn check_end(what: &'static str, start: u32, length: u32) -> Result<()> {
    let end = start as u64 + length as u64;
    if end > SANITY_LIMIT as u64 {
        return Err(Error::OutOfBounds {
            what,
            value: end,
            limit: SANITY_LIMIT as u64,
        });
    }
    Ok(())
}
