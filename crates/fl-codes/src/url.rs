// SPDX-License-Identifier: MIT OR Apache-2.0
//! `URL` domain: URL loading and networking failures.
//!
//! Values are sparse and negative, grouped by thousands: `-1xxx` for
//! transport and server problems, `-12xx` for TLS, `-3xxx` for downloads.

use std::fmt;

use fl_error::{Code, Fault};
use serde::{Deserialize, Serialize};

use crate::{CodeTable, Recoverability};

/// Context key for the URL that failed.
pub const FAILING_URL: &str = "failingUrl";
/// Context key for an HTTP status code.
pub const HTTP_STATUS: &str = "httpStatus";
/// Context key for a SOCKS proxy reply code.
pub const SOCKS_STATUS: &str = "socksStatus";

/// URL loading error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i64)]
pub enum UrlCode {
    /// Unknown failure.
    Unknown = -1,
    /// The request was cancelled.
    Cancelled = -999,
    /// Malformed URL.
    BadUrl = -1000,
    /// The request timed out.
    TimedOut = -1001,
    /// Scheme not supported.
    UnsupportedUrl = -1002,
    /// Host name could not be resolved.
    CannotFindHost = -1003,
    /// Host refused or failed the connection.
    CannotConnectToHost = -1004,
    /// Connection dropped mid-request.
    NetworkConnectionLost = -1005,
    /// DNS lookup failed.
    DnsLookupFailed = -1006,
    /// Redirect limit exceeded.
    HttpTooManyRedirects = -1007,
    /// Resource unavailable.
    ResourceUnavailable = -1008,
    /// No network connection.
    NotConnectedToInternet = -1009,
    /// Redirect target does not exist.
    RedirectToNonExistentLocation = -1010,
    /// Server returned an invalid response.
    BadServerResponse = -1011,
    /// User cancelled an authentication prompt.
    UserCancelledAuthentication = -1012,
    /// Authentication is required.
    UserAuthenticationRequired = -1013,
    /// Resource had no content.
    ZeroByteResource = -1014,
    /// Response body could not be decoded.
    CannotDecodeContentData = -1016,
    /// Response could not be parsed.
    CannotParseResponse = -1017,
    /// Local file does not exist.
    FileDoesNotExist = -1100,
    /// Local URL is a directory.
    FileIsDirectory = -1101,
    /// TLS handshake failed.
    SecureConnectionFailed = -1200,
    /// Server certificate is not trusted.
    ServerCertificateUntrusted = -1202,
    /// Client certificate is required.
    ClientCertificateRequired = -1206,
    /// Download could not create its destination file.
    CannotCreateFile = -3000,
    /// Download could not write its destination file.
    CannotWriteToFile = -3003,
}

impl CodeTable for UrlCode {
    const DOMAIN: &'static str = "URL";

    const ALL: &'static [Self] = &[
        Self::Unknown,
        Self::Cancelled,
        Self::BadUrl,
        Self::TimedOut,
        Self::UnsupportedUrl,
        Self::CannotFindHost,
        Self::CannotConnectToHost,
        Self::NetworkConnectionLost,
        Self::DnsLookupFailed,
        Self::HttpTooManyRedirects,
        Self::ResourceUnavailable,
        Self::NotConnectedToInternet,
        Self::RedirectToNonExistentLocation,
        Self::BadServerResponse,
        Self::UserCancelledAuthentication,
        Self::UserAuthenticationRequired,
        Self::ZeroByteResource,
        Self::CannotDecodeContentData,
        Self::CannotParseResponse,
        Self::FileDoesNotExist,
        Self::FileIsDirectory,
        Self::SecureConnectionFailed,
        Self::ServerCertificateUntrusted,
        Self::ClientCertificateRequired,
        Self::CannotCreateFile,
        Self::CannotWriteToFile,
    ];

    fn code(self) -> Code {
        self as Code
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cancelled => "CANCELLED",
            Self::BadUrl => "BAD_URL",
            Self::TimedOut => "TIMED_OUT",
            Self::UnsupportedUrl => "UNSUPPORTED_URL",
            Self::CannotFindHost => "CANNOT_FIND_HOST",
            Self::CannotConnectToHost => "CANNOT_CONNECT_TO_HOST",
            Self::NetworkConnectionLost => "NETWORK_CONNECTION_LOST",
            Self::DnsLookupFailed => "DNS_LOOKUP_FAILED",
            Self::HttpTooManyRedirects => "HTTP_TOO_MANY_REDIRECTS",
            Self::ResourceUnavailable => "RESOURCE_UNAVAILABLE",
            Self::NotConnectedToInternet => "NOT_CONNECTED_TO_INTERNET",
            Self::RedirectToNonExistentLocation => "REDIRECT_TO_NON_EXISTENT_LOCATION",
            Self::BadServerResponse => "BAD_SERVER_RESPONSE",
            Self::UserCancelledAuthentication => "USER_CANCELLED_AUTHENTICATION",
            Self::UserAuthenticationRequired => "USER_AUTHENTICATION_REQUIRED",
            Self::ZeroByteResource => "ZERO_BYTE_RESOURCE",
            Self::CannotDecodeContentData => "CANNOT_DECODE_CONTENT_DATA",
            Self::CannotParseResponse => "CANNOT_PARSE_RESPONSE",
            Self::FileDoesNotExist => "FILE_DOES_NOT_EXIST",
            Self::FileIsDirectory => "FILE_IS_DIRECTORY",
            Self::SecureConnectionFailed => "SECURE_CONNECTION_FAILED",
            Self::ServerCertificateUntrusted => "SERVER_CERTIFICATE_UNTRUSTED",
            Self::ClientCertificateRequired => "CLIENT_CERTIFICATE_REQUIRED",
            Self::CannotCreateFile => "CANNOT_CREATE_FILE",
            Self::CannotWriteToFile => "CANNOT_WRITE_TO_FILE",
        }
    }
}

impl UrlCode {
    /// Recoverability of this code.
    pub fn recoverability(self) -> Recoverability {
        match self {
            Self::Cancelled | Self::UserCancelledAuthentication => Recoverability::Cancelled,
            Self::TimedOut
            | Self::CannotFindHost
            | Self::CannotConnectToHost
            | Self::NetworkConnectionLost
            | Self::DnsLookupFailed
            | Self::ResourceUnavailable
            | Self::NotConnectedToInternet => Recoverability::Transient,
            Self::Unknown => Recoverability::Unknown,
            _ => Recoverability::Permanent,
        }
    }

    /// Fault for a failed request to `url`.
    pub fn for_url(self, url: &str) -> Fault {
        self.builder().url(url).context(FAILING_URL, url).build()
    }
}

impl fmt::Display for UrlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UrlCode> for Fault {
    fn from(code: UrlCode) -> Self {
        code.fault()
    }
}
