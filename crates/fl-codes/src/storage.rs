// SPDX-License-Identifier: MIT OR Apache-2.0
//! `Storage` domain: file reading and writing failures.

use std::fmt;
use std::path::Path;

use fl_error::{Code, Fault};
use serde::{Deserialize, Serialize};

use crate::{CodeTable, Recoverability};

/// File-system level error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i64)]
pub enum StorageCode {
    /// The file does not exist. Same number as `POSIX` `EINTR`.
    NoSuchFile = 4,
    /// The file is locked.
    Locking = 255,
    /// Unspecified read failure.
    ReadUnknown = 256,
    /// No permission to read.
    ReadNoPermission = 257,
    /// Invalid file name for reading.
    ReadInvalidFileName = 258,
    /// The file contents are corrupt.
    ReadCorruptFile = 259,
    /// No such file when reading.
    ReadNoSuchFile = 260,
    /// The file is too large to read.
    ReadTooLarge = 263,
    /// Unspecified write failure.
    WriteUnknown = 512,
    /// No permission to write.
    WriteNoPermission = 513,
    /// Invalid file name for writing.
    WriteInvalidFileName = 514,
    /// The file already exists.
    WriteFileExists = 516,
    /// The volume is out of space.
    WriteOutOfSpace = 640,
    /// The volume is read-only.
    WriteVolumeReadOnly = 642,
    /// The user cancelled the operation.
    UserCancelled = 3072,
}

impl CodeTable for StorageCode {
    const DOMAIN: &'static str = "Storage";

    const ALL: &'static [Self] = &[
        Self::NoSuchFile,
        Self::Locking,
        Self::ReadUnknown,
        Self::ReadNoPermission,
        Self::ReadInvalidFileName,
        Self::ReadCorruptFile,
        Self::ReadNoSuchFile,
        Self::ReadTooLarge,
        Self::WriteUnknown,
        Self::WriteNoPermission,
        Self::WriteInvalidFileName,
        Self::WriteFileExists,
        Self::WriteOutOfSpace,
        Self::WriteVolumeReadOnly,
        Self::UserCancelled,
    ];

    fn code(self) -> Code {
        self as Code
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::NoSuchFile => "NO_SUCH_FILE",
            Self::Locking => "LOCKING",
            Self::ReadUnknown => "READ_UNKNOWN",
            Self::ReadNoPermission => "READ_NO_PERMISSION",
            Self::ReadInvalidFileName => "READ_INVALID_FILE_NAME",
            Self::ReadCorruptFile => "READ_CORRUPT_FILE",
            Self::ReadNoSuchFile => "READ_NO_SUCH_FILE",
            Self::ReadTooLarge => "READ_TOO_LARGE",
            Self::WriteUnknown => "WRITE_UNKNOWN",
            Self::WriteNoPermission => "WRITE_NO_PERMISSION",
            Self::WriteInvalidFileName => "WRITE_INVALID_FILE_NAME",
            Self::WriteFileExists => "WRITE_FILE_EXISTS",
            Self::WriteOutOfSpace => "WRITE_OUT_OF_SPACE",
            Self::WriteVolumeReadOnly => "WRITE_VOLUME_READ_ONLY",
            Self::UserCancelled => "USER_CANCELLED",
        }
    }
}

impl StorageCode {
    /// Recoverability of this code.
    pub fn recoverability(self) -> Recoverability {
        match self {
            Self::UserCancelled => Recoverability::Cancelled,
            Self::Locking => Recoverability::Transient,
            Self::ReadUnknown | Self::WriteUnknown => Recoverability::Unknown,
            _ => Recoverability::Permanent,
        }
    }

    /// `true` for the read-side codes (256..=511).
    pub fn is_read_error(self) -> bool {
        (256..512).contains(&self.code())
    }

    /// `true` for the write-side codes (512..=767).
    pub fn is_write_error(self) -> bool {
        (512..768).contains(&self.code())
    }

    /// Fault about the file at `path`.
    pub fn for_path(self, path: impl AsRef<Path>) -> Fault {
        self.builder().file_path(path).build()
    }
}

impl fmt::Display for StorageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StorageCode> for Fault {
    fn from(code: StorageCode) -> Self {
        code.fault()
    }
}
