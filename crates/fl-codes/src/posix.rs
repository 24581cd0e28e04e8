// SPDX-License-Identifier: MIT OR Apache-2.0
//! `POSIX` domain: operating-system error numbers (Linux values).

use std::fmt;
use std::io;

use fl_error::{Code, Fault};
use serde::{Deserialize, Serialize};

use crate::{CodeTable, Recoverability};

/// A subset of `errno` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i64)]
pub enum PosixCode {
    /// Operation not permitted.
    Eperm = 1,
    /// No such file or directory.
    Enoent = 2,
    /// No such process.
    Esrch = 3,
    /// Interrupted system call.
    Eintr = 4,
    /// Input/output error.
    Eio = 5,
    /// Bad file descriptor.
    Ebadf = 9,
    /// Resource temporarily unavailable.
    Eagain = 11,
    /// Cannot allocate memory.
    Enomem = 12,
    /// Permission denied.
    Eacces = 13,
    /// Device or resource busy.
    Ebusy = 16,
    /// File exists.
    Eexist = 17,
    /// Not a directory.
    Enotdir = 20,
    /// Is a directory.
    Eisdir = 21,
    /// Invalid argument.
    Einval = 22,
    /// No space left on device.
    Enospc = 28,
    /// Broken pipe.
    Epipe = 32,
    /// Connection reset by peer.
    Econnreset = 104,
    /// Connection timed out.
    Etimedout = 110,
    /// Connection refused.
    Econnrefused = 111,
    /// No route to host.
    Ehostunreach = 113,
    /// Operation canceled.
    Ecanceled = 125,
}

impl CodeTable for PosixCode {
    const DOMAIN: &'static str = "POSIX";

    const ALL: &'static [Self] = &[
        Self::Eperm,
        Self::Enoent,
        Self::Esrch,
        Self::Eintr,
        Self::Eio,
        Self::Ebadf,
        Self::Eagain,
        Self::Enomem,
        Self::Eacces,
        Self::Ebusy,
        Self::Eexist,
        Self::Enotdir,
        Self::Eisdir,
        Self::Einval,
        Self::Enospc,
        Self::Epipe,
        Self::Econnreset,
        Self::Etimedout,
        Self::Econnrefused,
        Self::Ehostunreach,
        Self::Ecanceled,
    ];

    fn code(self) -> Code {
        self as Code
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Eperm => "EPERM",
            Self::Enoent => "ENOENT",
            Self::Esrch => "ESRCH",
            Self::Eintr => "EINTR",
            Self::Eio => "EIO",
            Self::Ebadf => "EBADF",
            Self::Eagain => "EAGAIN",
            Self::Enomem => "ENOMEM",
            Self::Eacces => "EACCES",
            Self::Ebusy => "EBUSY",
            Self::Eexist => "EEXIST",
            Self::Enotdir => "ENOTDIR",
            Self::Eisdir => "EISDIR",
            Self::Einval => "EINVAL",
            Self::Enospc => "ENOSPC",
            Self::Epipe => "EPIPE",
            Self::Econnreset => "ECONNRESET",
            Self::Etimedout => "ETIMEDOUT",
            Self::Econnrefused => "ECONNREFUSED",
            Self::Ehostunreach => "EHOSTUNREACH",
            Self::Ecanceled => "ECANCELED",
        }
    }
}

impl PosixCode {
    /// Recoverability of this code.
    pub fn recoverability(self) -> Recoverability {
        match self {
            Self::Eintr
            | Self::Eagain
            | Self::Ebusy
            | Self::Econnreset
            | Self::Etimedout
            | Self::Econnrefused
            | Self::Ehostunreach => Recoverability::Transient,
            Self::Ecanceled => Recoverability::Cancelled,
            Self::Eio => Recoverability::Unknown,
            _ => Recoverability::Permanent,
        }
    }

    fn from_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::Enoent,
            io::ErrorKind::PermissionDenied => Self::Eacces,
            io::ErrorKind::AlreadyExists => Self::Eexist,
            io::ErrorKind::Interrupted => Self::Eintr,
            io::ErrorKind::WouldBlock => Self::Eagain,
            io::ErrorKind::TimedOut => Self::Etimedout,
            io::ErrorKind::ConnectionRefused => Self::Econnrefused,
            io::ErrorKind::ConnectionReset => Self::Econnreset,
            io::ErrorKind::BrokenPipe => Self::Epipe,
            io::ErrorKind::InvalidInput => Self::Einval,
            io::ErrorKind::OutOfMemory => Self::Enomem,
            _ => Self::Eio,
        }
    }
}

impl fmt::Display for PosixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PosixCode> for Fault {
    fn from(code: PosixCode) -> Self {
        code.fault()
    }
}

/// Translate an I/O error into a `POSIX` fault.
///
/// The raw OS error number is used when present, otherwise the error kind
/// is mapped onto the nearest code. The I/O error is kept as the cause.
pub fn from_io(err: io::Error) -> Fault {
    let code = err
        .raw_os_error()
        .map(Code::from)
        .unwrap_or_else(|| PosixCode::from_kind(err.kind()).code());
    Fault::builder(PosixCode::domain(), code)
        .failure_reason(err.to_string())
        .foreign_cause(err)
        .build()
}
