//! Durable random-access file I/O
//!
//! 持久化随机访问文件 I/O
//!
//! This library wraps an already-open file handle and offers the primitives a storage
//! engine needs: positioned reads and writes, length queries and adjustment, bulk zero
//! fill, and relocation of a byte range to another place in the same file. Every
//! operation that writes is followed by a durability barrier, so an `Ok` means the
//! bytes have been handed to stable storage.
//!
//! 本库封装一个已打开的文件句柄，提供存储引擎所需的基本操作：定位读写、长度查询与调整、
//! 批量清零，以及将字节区间搬移到同一文件中的另一位置。每个写操作之后都会执行持久化屏障，
//! 因此返回 `Ok` 表示数据已交给稳定存储。
//!
//! # Features
//!
//! - **Durable writes**: flush + sync after every write, zero fill and transfer
//! - **Bounded memory**: transfers copy through a fixed [`COPY_BUFFER_SIZE`] buffer
//! - **Checked arguments**: every offset and length is checked against [`SANITY_LIMIT`]
//!   before the handle is touched
//! - **Attributed failures**: each error names the storage step that failed and is
//!   reported once to a [`Diagnostics`] sink
//! - **Pluggable storage**: anything implementing [`FileHandle`]
//!
//! # 特性
//!
//! - **持久写入**：每次写入、清零和搬移之后都执行 flush + sync
//! - **内存有界**：搬移通过固定大小为 [`COPY_BUFFER_SIZE`] 的缓冲区复制
//! - **参数检查**：访问句柄之前检查所有偏移和长度是否小于 [`SANITY_LIMIT`]
//! - **可归因的失败**：每个错误指明失败的存储步骤，并向 [`Diagnostics`] 报告一次
//! - **可替换存储**：任何实现 [`FileHandle`] 的类型
//!
//! # Quick Start
//!
//! ```
//! use durable_file::DurableFile;
//! # use tempfile::tempdir;
//! # use std::fs::OpenOptions;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempdir()?;
//! # let path = dir.path().join("tape.bin");
//! # let handle = OpenOptions::new().read(true).write(true).create(true).truncate(true).open(&path)?;
//!
//! let mut file = DurableFile::new(handle);
//!
//! // Reserve space, then write a record
//! // 预留空间，然后写入一条记录
//! file.set_len(16)?;
//! file.seek(0)?;
//! file.write(b"record", 0, 6)?;
//!
//! // Copy the record further down the file
//! // 将记录复制到文件后部
//! file.transfer_to(0, 8, 6)?;
//!
//! let mut buf = [0u8; 6];
//! file.seek(8)?;
//! file.read(&mut buf, 0, 6)?;
//! assert_eq!(&buf, b"record");
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Diagnostics
//!
//! By default failures are emitted as `tracing` events. Supply any [`Diagnostics`]
//! implementation to route them elsewhere:
//!
//! ## 自定义诊断
//!
//! 默认情况下失败以 `tracing` 事件输出。提供任意 [`Diagnostics`] 实现即可改变去处：
//!
//! ```
//! use durable_file::{Diagnostic, Diagnostics, DurableFile};
//! use std::cell::Cell;
//! use std::io::Cursor;
//!
//! #[derive(Default)]
//! struct CountFailures(Cell<usize>);
//!
//! impl Diagnostics for CountFailures {
//!     fn report(&self, _diagnostic: &Diagnostic<'_>) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//!
//! let counter = CountFailures::default();
//! let mut file = DurableFile::with_diagnostics(Cursor::new(Vec::new()), &counter);
//!
//! assert!(file.seek(u32::MAX).is_err());
//! assert_eq!(counter.0.get(), 1);
//! ```
//!
//! # Main Types
//!
//! - [`DurableFile`]: durable operations over a [`FileHandle`]
//! - [`FileHandle`]: storage seam
//! - [`TransferRange`]: validated relocation request
//! - [`Options`] / [`ZeroFill`]: behavior switches
//! - [`Error`] / [`Severity`] / [`IoStep`]: failure description
//!
//! # 主要类型
//!
//! - [`DurableFile`]：基于 [`FileHandle`] 的持久化操作
//! - [`FileHandle`]：存储层接口
//! - [`TransferRange`]：经过验证的搬移请求
//! - [`Options`] / [`ZeroFill`]：行为开关
//! - [`Error`] / [`Severity`] / [`IoStep`]：失败描述

mod file;

pub use file::{
    COPY_BUFFER_SIZE, Diagnostic, Diagnostics, DurableFile, Error, FileHandle, IoStep,
    NoopDiagnostics, Operation, Options, Result, SANITY_LIMIT, Severity, TracingDiagnostics,
    TransferRange, ZeroFill,
};
