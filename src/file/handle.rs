//! File handle abstraction
//!
//! 文件句柄抽象

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// An already-open, seekable, byte-addressable file handle
///
/// 已打开的、可定位、可按字节寻址的文件句柄
///
/// This is the only seam between [`DurableFile`](super::DurableFile) and the storage
/// layer. Each method maps to exactly one storage step so that a failure can be
/// attributed to it.
///
/// 这是 [`DurableFile`](super::DurableFile) 与存储层之间唯一的接口。
/// 每个方法恰好对应一个存储步骤，以便将失败归因到具体步骤。
///
/// Implementations must not open, reopen or close the underlying file.
///
/// 实现不得打开、重新打开或关闭底层文件。
#[cfg_attr(test, mockall::automock)]
pub trait FileHandle {
    /// Move the cursor to an absolute position
    ///
    /// 将游标移动到绝对位置
    fn seek_to(&mut self, position: u64) -> io::Result<()>;

    /// Read up to `buf.len()` bytes at the cursor; `Ok(0)` means end of file
    ///
    /// 在游标处读取至多 `buf.len()` 字节；`Ok(0)` 表示文件结束
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write up to `buf.len()` bytes at the cursor
    ///
    /// 在游标处写入至多 `buf.len()` 字节
    fn write_from(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Push in-process buffered bytes down to the OS
    ///
    /// 将进程内缓冲的字节交给操作系统
    fn flush(&mut self) -> io::Result<()>;

    /// Force data and metadata to durable storage
    ///
    /// 强制将数据和元数据写入持久存储
    fn sync_all(&mut self) -> io::Result<()>;

    /// Current size from metadata, without touching the cursor
    ///
    /// 通过元数据获取当前大小，不移动游标
    fn file_len(&self) -> io::Result<u64>;

    /// Truncate or extend to exactly `len` bytes
    ///
    /// 截断或扩展到恰好 `len` 字节
    fn set_len(&mut self, len: u64) -> io::Result<()>;

    /// Numeric identifier for diagnostics, if the platform has one
    ///
    /// 用于诊断的数字标识（如平台支持）
    fn raw_id(&self) -> Option<i64> {
        None
    }
}

impl FileHandle for File {
    #[inline]
    fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(position)).map(|_| ())
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    #[inline]
    fn write_from(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(self, buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        File::sync_all(self)
    }

    fn file_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    #[cfg(unix)]
    fn raw_id(&self) -> Option<i64> {
        use std::os::unix::io::AsRawFd;
        Some(self.as_raw_fd() as i64)
    }

    #[cfg(windows)]
    fn raw_id(&self) -> Option<i64> {
        use std::os::windows::io::AsRawHandle;
        Some(self.as_raw_handle() as isize as i64)
    }
}

/// In-memory handle; durability steps are no-ops
///
/// 内存句柄；持久化步骤为空操作
impl FileHandle for Cursor<Vec<u8>> {
    #[inline]
    fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.set_position(position);
        Ok(())
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    #[inline]
    fn write_from(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn sync_all(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn file_len(&self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

/// Lend a handle without giving it up
///
/// 借出句柄而不转移所有权
impl<H: FileHandle + ?Sized> FileHandle for &mut H {
    #[inline]
    fn seek_to(&mut self, position: u64) -> io::Result<()> {
        (**self).seek_to(position)
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_into(buf)
    }

    #[inline]
    fn write_from(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write_from(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        FileHandle::flush(&mut **self)
    }

    #[inline]
    fn sync_all(&mut self) -> io::Result<()> {
        FileHandle::sync_all(&mut **self)
    }

    #[inline]
    fn file_len(&self) -> io::Result<u64> {
        (**self).file_len()
    }

    #[inline]
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        FileHandle::set_len(&mut **self, len)
    }

    #[inline]
    fn raw_id(&self) -> Option<i64> {
        (**self).raw_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempfile;

    #[test]
    fn test_file_handle_roundtrip() {
        let mut file = tempfile().unwrap();

        assert_eq!(file.write_from(b"hello world").unwrap(), 11);
        FileHandle::flush(&mut file).unwrap();
        FileHandle::sync_all(&mut file).unwrap();
        assert_eq!(file.file_len().unwrap(), 11);

        file.seek_to(6).unwrap();
        let mut buf = [0u8; 5];
        assert_eq!(file.read_into(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"world");

        FileHandle::set_len(&mut file, 5).unwrap();
        assert_eq!(file.file_len().unwrap(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_handle_exposes_fd() {
        let file = tempfile().unwrap();
        assert!(file.raw_id().is_some_and(|fd| fd >= 0));
    }

    #[test]
    fn test_cursor_handle() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_from(b"abcd").unwrap();
        assert_eq!(cursor.file_len().unwrap(), 4);
        assert_eq!(cursor.raw_id(), None);

        // 扩展的区域填充为 0
        FileHandle::set_len(&mut cursor, 8).unwrap();
        assert_eq!(cursor.get_ref(), b"abcd\0\0\0\0");

        cursor.seek_to(2).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(cursor.read_into(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], b"cd\0\0\0\0");
    }

    fn overwrite_second_byte<H: FileHandle>(mut handle: H) -> io::Result<u64> {
        handle.seek_to(1)?;
        handle.write_from(b"Y")?;
        handle.file_len()
    }

    #[test]
    fn test_borrowed_handle_forwards() {
        let mut cursor = Cursor::new(b"xyz".to_vec());
        assert_eq!(overwrite_second_byte(&mut cursor).unwrap(), 3);
        assert_eq!(cursor.get_ref(), b"xYz");
    }
}
