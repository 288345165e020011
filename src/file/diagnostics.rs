//! Failure reporting
//!
//! 失败报告
//!
//! Every failed operation is reported exactly once to a [`Diagnostics`] sink before the
//! error is returned. The sink is injected into [`DurableFile`](super::DurableFile), so the
//! data path never reaches for a global logger.
//!
//! 每个失败的操作在返回错误之前都会恰好向 [`Diagnostics`] 报告一次。
//! 该接收器被注入到 [`DurableFile`](super::DurableFile) 中，数据路径不依赖全局日志器。

use super::error::{Error, Severity};
use std::fmt;

/// The public operation that failed
///
/// 失败的公共操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Seek,
    Read,
    Write,
    GetLength,
    WriteZeros,
    SetLength,
    TransferTo,
}

impl Operation {
    /// Name used in log fields
    ///
    /// 日志字段中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Seek => "seek",
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::GetLength => "get_length",
            Operation::WriteZeros => "write_zeros",
            Operation::SetLength => "set_length",
            Operation::TransferTo => "transfer_to",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure report
///
/// 一条失败报告
#[derive(Debug, Clone, Copy)]
pub struct Diagnostic<'a> {
    /// Operation that failed
    ///
    /// 失败的操作
    pub operation: Operation,

    /// Numeric handle identifier, when the handle exposes one
    ///
    /// 数字句柄标识（如句柄提供）
    pub handle: Option<i64>,

    /// The error being returned to the caller
    ///
    /// 返回给调用方的错误
    pub error: &'a Error,
}

impl Diagnostic<'_> {
    /// Severity class, derived from the error
    ///
    /// 严重级别，由错误推导
    #[inline]
    pub fn severity(&self) -> Severity {
        self.error.severity()
    }
}

/// Receiver of failure reports
///
/// 失败报告的接收器
pub trait Diagnostics {
    /// Record one failure
    ///
    /// 记录一次失败
    fn report(&self, diagnostic: &Diagnostic<'_>);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    #[inline]
    fn report(&self, diagnostic: &Diagnostic<'_>) {
        (**self).report(diagnostic)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for std::sync::Arc<D> {
    #[inline]
    fn report(&self, diagnostic: &Diagnostic<'_>) {
        (**self).report(diagnostic)
    }
}

/// Forwards reports to `tracing`
///
/// 将报告转发到 `tracing`
///
/// Fatal-class reports become `ERROR` events named `durable_file.fatal`,
/// warning-class reports become `WARN` events named `durable_file.warning`.
///
/// 致命级报告生成名为 `durable_file.fatal` 的 `ERROR` 事件，
/// 警告级报告生成名为 `durable_file.warning` 的 `WARN` 事件。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: &Diagnostic<'_>) {
        match diagnostic.severity() {
            Severity::Fatal => tracing::event!(
                name: "durable_file.fatal",
                tracing::Level::ERROR,
                operation = diagnostic.operation.as_str(),
                handle = ?diagnostic.handle,
                error = %diagnostic.error,
            ),
            Severity::Warning => tracing::event!(
                name: "durable_file.warning",
                tracing::Level::WARN,
                operation = diagnostic.operation.as_str(),
                handle = ?diagnostic.handle,
                error = %diagnostic.error,
            ),
        }
    }
}

/// Drops every report
///
/// 丢弃所有报告
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    #[inline]
    fn report(&self, _diagnostic: &Diagnostic<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::error::IoStep;
    use std::io;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_tracing_fatal_report() {
        let error = Error::UnalignedZeroFill { length: 6 };
        TracingDiagnostics.report(&Diagnostic {
            operation: Operation::WriteZeros,
            handle: Some(7),
            error: &error,
        });

        assert!(logs_contain("ERROR"));
        assert!(logs_contain("write_zeros"));
        assert!(logs_contain("Some(7)"));
        assert!(logs_contain("multiple of 4 bytes, got 6"));
    }

    #[test]
    #[traced_test]
    fn test_tracing_warning_report() {
        let error = Error::Io {
            step: IoStep::Sync,
            source: io::Error::other("device detached"),
        };
        TracingDiagnostics.report(&Diagnostic {
            operation: Operation::SetLength,
            handle: None,
            error: &error,
        });

        assert!(logs_contain("WARN"));
        assert!(logs_contain("set_length"));
        assert!(logs_contain("device detached"));
        assert!(!logs_contain("ERROR"));
    }

    #[test]
    fn test_noop_and_borrowed_sinks() {
        let error = Error::ShortRead { expected: 4, actual: 0 };
        let diagnostic = Diagnostic {
            operation: Operation::Read,
            handle: None,
            error: &error,
        };
        assert_eq!(diagnostic.severity(), Severity::Warning);

        let sink = NoopDiagnostics;
        (&sink).report(&diagnostic);
        std::sync::Arc::new(sink).report(&diagnostic);
    }
}
