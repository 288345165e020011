//! Durable random-access file
//!
//! 持久化随机访问文件

use super::bounds;
use super::diagnostics::{Diagnostic, Diagnostics, Operation, TracingDiagnostics};
use super::error::{Error, IoStep, Result};
use super::handle::FileHandle;
use super::options::Options;
use super::range::TransferRange;
use std::io;
use std::ops::Range;

/// Capacity of the stack buffer used by [`DurableFile::transfer_to`]
///
/// [`DurableFile::transfer_to`] 使用的栈缓冲区容量
pub const COPY_BUFFER_SIZE: usize = 4096;

const ZERO_WORD: u64 = 4;

/// Durable random-access file
///
/// 持久化随机访问文件
///
/// Wraps an already-open [`FileHandle`] and provides positioned reads and writes,
/// length queries and adjustment, zero filling, and in-place block relocation. Every
/// operation that writes ends with a durability barrier (flush, then sync) before it
/// returns `Ok`.
///
/// 封装一个已打开的 [`FileHandle`]，提供定位读写、长度查询与调整、清零以及文件内块搬移。
/// 每个写操作在返回 `Ok` 之前都会执行持久化屏障（先 flush，再 sync）。
///
/// # Contract
///
/// - Offsets and lengths are `u32` and must stay below [`SANITY_LIMIT`](super::SANITY_LIMIT).
///   Violations are fatal-class errors reported before the handle is touched.
/// - [`read`](Self::read), [`write`](Self::write) and [`write_zeros`](Self::write_zeros)
///   operate at the current cursor; position it first with [`seek`](Self::seek).
/// - A failed write-path operation leaves the file in whatever state the completed steps
///   produced. Nothing is rolled back or retried.
/// - One writer per handle. [`transfer_to`](Self::transfer_to) is a non-atomic
///   seek/read/seek/write sequence; other handles to the same file must not write
///   while it runs.
///
/// # 约定
///
/// - 偏移和长度为 `u32`，必须小于 [`SANITY_LIMIT`](super::SANITY_LIMIT)。
///   违反时在访问句柄之前报告致命级错误。
/// - [`read`](Self::read)、[`write`](Self::write) 和 [`write_zeros`](Self::write_zeros)
///   在当前游标处操作；请先用 [`seek`](Self::seek) 定位。
/// - 写操作失败后文件处于已完成步骤留下的状态，不会回滚或重试。
/// - 每个句柄只允许一个写入者。[`transfer_to`](Self::transfer_to) 是非原子的
///   定位/读/定位/写序列，运行期间其他句柄不得写入同一文件。
///
/// Every failure is reported once to the [`Diagnostics`] sink before it is returned.
///
/// 每个失败在返回之前都会向 [`Diagnostics`] 报告一次。
///
/// # Examples
///
/// ```
/// use durable_file::DurableFile;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut file = DurableFile::new(tempfile::tempfile()?);
///
/// file.seek(0)?;
/// file.write(b"ABCDEFGH", 0, 4)?;
/// file.set_len(8)?;
///
/// // Move [0, 4) to [4, 8)
/// // 将 [0, 4) 搬移到 [4, 8)
/// file.transfer_to(0, 4, 4)?;
///
/// let mut buf = [0u8; 8];
/// file.seek(0)?;
/// file.read(&mut buf, 0, 8)?;
/// assert_eq!(&buf, b"ABCDABCD");
/// assert_eq!(file.len()?, 8);
/// # Ok(())
/// # }
/// ```
pub struct DurableFile<H, D = TracingDiagnostics> {
    handle: H,

    /// Captured once so reporting never calls into the handle
    ///
    /// 仅获取一次，报告时不再访问句柄
    handle_id: Option<i64>,

    diagnostics: D,
    options: Options,
}

impl<H: FileHandle> DurableFile<H> {
    /// Wrap a handle, reporting failures through `tracing`
    ///
    /// 封装句柄，通过 `tracing` 报告失败
    pub fn new(handle: H) -> Self {
        Self::with_diagnostics(handle, TracingDiagnostics)
    }
}

impl<H: FileHandle, D: Diagnostics> DurableFile<H, D> {
    /// Wrap a handle, reporting failures to `diagnostics`
    ///
    /// 封装句柄，向 `diagnostics` 报告失败
    pub fn with_diagnostics(handle: H, diagnostics: D) -> Self {
        let handle_id = handle.raw_id();
        Self {
            handle,
            handle_id,
            diagnostics,
            options: Options::default(),
        }
    }

    /// Replace the options
    ///
    /// 替换选项
    #[inline]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Current options
    ///
    /// 当前选项
    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Borrow the underlying handle
    ///
    /// 借用底层句柄
    #[inline]
    pub fn get_ref(&self) -> &H {
        &self.handle
    }

    /// Mutably borrow the underlying handle
    ///
    /// 可变借用底层句柄
    ///
    /// Moving the cursor through this reference affects subsequent cursor-relative calls.
    ///
    /// 通过该引用移动游标会影响后续基于游标的调用。
    #[inline]
    pub fn get_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// Give the handle back to the caller
    ///
    /// 将句柄交还给调用方
    #[inline]
    pub fn into_inner(self) -> H {
        self.handle
    }

    /// Move the cursor to `position`
    ///
    /// 将游标移动到 `position`
    ///
    /// # Errors
    /// - `OutOfBounds` (fatal) if `position` reaches the ceiling
    /// - `Io { step: Seek }` (warning) if the handle cannot reposition
    pub fn seek(&mut self, position: u32) -> Result<()> {
        let result = self.seek_inner(position);
        self.observe(Operation::Seek, result)
    }

    /// Read exactly `length` bytes at the cursor into `buffer[offset..offset + length]`
    ///
    /// 在游标处恰好读取 `length` 字节到 `buffer[offset..offset + length]`
    ///
    /// `offset` indexes the buffer, not the file. No seek is performed; the cursor
    /// advances by the bytes consumed, including on a short read.
    ///
    /// `offset` 是缓冲区内的偏移而非文件偏移。不执行 seek；游标按实际消耗的字节前进（包括读取不足时）。
    ///
    /// # Errors
    /// - `OutOfBounds` / `BufferTooSmall` (fatal) for bad arguments
    /// - `ShortRead` (warning) at end of file
    /// - `Io { step: Read }` (warning)
    pub fn read(&mut self, buffer: &mut [u8], offset: u32, length: u32) -> Result<()> {
        let result = self.read_inner(buffer, offset, length);
        self.observe(Operation::Read, result)
    }

    /// Write `buffer[offset..offset + length]` at the cursor, then flush and sync
    ///
    /// 在游标处写入 `buffer[offset..offset + length]`，然后 flush 并 sync
    ///
    /// On `Ok` the bytes survive a process crash. A zero-length write still performs
    /// the barrier.
    ///
    /// 返回 `Ok` 时数据可在进程崩溃后保留。零长度写入同样执行屏障。
    ///
    /// # Errors
    /// - `OutOfBounds` / `BufferTooSmall` (fatal) for bad arguments
    /// - `ShortWrite` (warning) if the handle stops accepting bytes
    /// - `Io { step: Write | Flush | Sync }` (warning)
    pub fn write(&mut self, buffer: &[u8], offset: u32, length: u32) -> Result<()> {
        let result = self.write_inner(buffer, offset, length);
        self.observe(Operation::Write, result)
    }

    /// Current file size from metadata; the cursor is not moved
    ///
    /// 通过元数据获取当前文件大小；不移动游标
    ///
    /// # Errors
    /// `Io { step: Stat }` (warning)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<u64> {
        let result = self.handle.file_len().map_err(Error::at(IoStep::Stat));
        self.observe(Operation::GetLength, result)
    }

    /// Write `length` zero bytes at the cursor, then flush and sync once
    ///
    /// 在游标处写入 `length` 个零字节，然后执行一次 flush 和 sync
    ///
    /// `length` must be a multiple of 4. With [`ZeroFill::TrailingWord`](super::ZeroFill::TrailingWord)
    /// one extra zero word is written after the requested bytes.
    ///
    /// `length` 必须是 4 的倍数。使用 [`ZeroFill::TrailingWord`](super::ZeroFill::TrailingWord)
    /// 时会在请求的字节之后多写一个零字。
    ///
    /// # Errors
    /// - `UnalignedZeroFill` / `OutOfBounds` (fatal)
    /// - `ShortWrite` / `Io { step: Write | Flush | Sync }` (warning)
    pub fn write_zeros(&mut self, length: u32) -> Result<()> {
        let result = self.write_zeros_inner(length);
        self.observe(Operation::WriteZeros, result)
    }

    /// Truncate or extend the file to exactly `length` bytes, then sync
    ///
    /// 将文件截断或扩展到恰好 `length` 字节，然后 sync
    ///
    /// An extended region is not explicitly zero-filled; see [`write_zeros`](Self::write_zeros).
    ///
    /// 扩展的区域不会被显式清零；参见 [`write_zeros`](Self::write_zeros)。
    ///
    /// # Errors
    /// - `OutOfBounds` (fatal)
    /// - `Io { step: Truncate | Sync }` (warning)
    pub fn set_len(&mut self, length: u32) -> Result<()> {
        let result = self.set_len_inner(length);
        self.observe(Operation::SetLength, result)
    }

    /// Copy `length` bytes from `source` to `destination` within the file
    ///
    /// 在文件内将 `length` 字节从 `source` 复制到 `destination`
    ///
    /// The copy goes through a [`COPY_BUFFER_SIZE`] stack buffer, so memory use is
    /// constant regardless of `length`. The source and destination ranges must not
    /// intersect (see [`TransferRange`]). The caller guarantees that the source range
    /// holds `length` bytes of data. One barrier is issued after the last chunk. The
    /// cursor is left after the last byte written.
    ///
    /// 复制通过 [`COPY_BUFFER_SIZE`] 大小的栈缓冲区进行，内存占用与 `length` 无关。
    /// 源区间与目标区间不得相交（参见 [`TransferRange`]）。调用方需保证源区间含有 `length` 字节数据。
    /// 最后一块写入后执行一次屏障。游标停在最后写入字节之后。
    ///
    /// # Errors
    /// - `OutOfBounds` (fatal), before any I/O
    /// - `OverlappingTransfer` (warning), before any I/O
    /// - `TransferInterrupted` (warning) wrapping the seek, read or write failure that
    ///   stopped the copy; earlier chunks stay written
    /// - `Io { step: Flush | Sync }` (warning)
    pub fn transfer_to(&mut self, source: u32, destination: u32, length: u32) -> Result<()> {
        let result = self.transfer_to_inner(source, destination, length);
        self.observe(Operation::TransferTo, result)
    }

    fn seek_inner(&mut self, position: u32) -> Result<()> {
        bounds::check("seek position", position)?;
        self.handle
            .seek_to(position as u64)
            .map_err(Error::at(IoStep::Seek))
    }

    fn read_inner(&mut self, buffer: &mut [u8], offset: u32, length: u32) -> Result<()> {
        bounds::check("read buffer offset", offset)?;
        bounds::check("read length", length)?;
        let window = window(buffer.len(), offset, length)?;
        read_exact(&mut self.handle, &mut buffer[window])
    }

    fn write_inner(&mut self, buffer: &[u8], offset: u32, length: u32) -> Result<()> {
        bounds::check("write buffer offset", offset)?;
        bounds::check("write length", length)?;
        let window = window(buffer.len(), offset, length)?;
        write_all(&mut self.handle, &buffer[window])?;
        self.barrier()
    }

    fn write_zeros_inner(&mut self, length: u32) -> Result<()> {
        if length as u64 % ZERO_WORD != 0 {
            return Err(Error::UnalignedZeroFill { length });
        }
        bounds::check("zero fill length", length)?;

        // Whole words per write, batched up to the copy buffer size
        let zeros = [0u8; COPY_BUFFER_SIZE];
        let mut remaining = self.options.zero_fill_policy().words(length) * ZERO_WORD;
        while remaining > 0 {
            let chunk = remaining.min(COPY_BUFFER_SIZE as u64) as usize;
            write_all(&mut self.handle, &zeros[..chunk])?;
            remaining -= chunk as u64;
        }

        self.barrier()
    }

    fn set_len_inner(&mut self, length: u32) -> Result<()> {
        bounds::check("file length", length)?;
        self.handle
            .set_len(length as u64)
            .map_err(Error::at(IoStep::Truncate))?;
        self.handle.sync_all().map_err(Error::at(IoStep::Sync))
    }

    fn transfer_to_inner(&mut self, source: u32, destination: u32, length: u32) -> Result<()> {
        let range = TransferRange::new(source, destination, length)?;

        let mut buffer = [0u8; COPY_BUFFER_SIZE];
        let mut source = range.source().start;
        let mut destination = range.destination().start;
        let mut remaining = range.len();

        while remaining > 0 {
            let chunk = (remaining as usize).min(COPY_BUFFER_SIZE);
            self.transfer_chunk(&mut buffer[..chunk], source, destination)
                .map_err(|cause| Error::TransferInterrupted {
                    source_offset: source,
                    destination,
                    remaining,
                    cause: Box::new(cause),
                })?;

            // chunk <= COPY_BUFFER_SIZE
            let moved = chunk as u32;
            source += moved;
            destination += moved;
            remaining -= moved;
        }

        self.barrier()
    }

    /// Move one chunk; `buffer.len()` is the chunk size
    fn transfer_chunk(&mut self, buffer: &mut [u8], source: u32, destination: u32) -> Result<()> {
        self.seek_inner(source)?;
        read_exact(&mut self.handle, buffer)?;
        self.seek_inner(destination)?;
        write_all(&mut self.handle, buffer)
    }

    /// Flush, then sync
    ///
    /// 先 flush，再 sync
    fn barrier(&mut self) -> Result<()> {
        self.handle.flush().map_err(Error::at(IoStep::Flush))?;
        self.handle.sync_all().map_err(Error::at(IoStep::Sync))
    }

    fn observe<T>(&self, operation: Operation, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.diagnostics.report(&Diagnostic {
                operation,
                handle: self.handle_id,
                error,
            });
        }
        result
    }
}

impl<H: std::fmt::Debug, D> std::fmt::Debug for DurableFile<H, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableFile")
            .field("handle", &self.handle)
            .field("handle_id", &self.handle_id)
            .field("options", &self.options)
            .finish()
    }
}

/// Range of the caller buffer addressed by `offset` and `length`
///
/// 调用方缓冲区中由 `offset` 和 `length` 指定的范围
#[inline]
fn window(buffer_len: usize, offset: u32, length: u32) -> Result<Range<usize>> {
    let start = offset as usize;
    match start.checked_add(length as usize) {
        Some(end) if end <= buffer_len => Ok(start..end),
        _ => Err(Error::BufferTooSmall {
            buffer_len,
            offset,
            length,
        }),
    }
}

/// Fill `buf` completely or report how far it got
///
/// 完整填充 `buf`，否则报告读取了多少
fn read_exact<H: FileHandle + ?Sized>(handle: &mut H, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match handle.read_into(&mut buf[filled..]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    expected: buf.len(),
                    actual: filled,
                });
            }
            Ok(n) => filled += n.min(buf.len() - filled),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io { step: IoStep::Read, source: e }),
        }
    }
    Ok(())
}

/// Write all of `buf` or report how far it got
///
/// 写入全部 `buf`，否则报告写入了多少
fn write_all<H: FileHandle + ?Sized>(handle: &mut H, buf: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match handle.write_from(&buf[written..]) {
            Ok(0) => {
                return Err(Error::ShortWrite {
                    expected: buf.len(),
                    actual: written,
                });
            }
            Ok(n) => written += n.min(buf.len() - written),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io { step: IoStep::Write, source: e }),
        }
    }
    Ok(())
}
