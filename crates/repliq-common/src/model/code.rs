use serde::Serialize;

/// Response code space used throughout the client.
///
/// This covers the subset of real HTTP status codes the client inspects plus
/// a synthetic range for outcomes that never produced a network response:
/// local timeouts, cancellation, and transport failures. Synthetic codes live
/// at `0` (no informative response at all) and in the `520+` block, adjacent
/// to but outside the standard HTTP space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ResponseCode {
    /// No informative response is available.
    Unknown = 0,

    Ok = 200,
    Created = 201,
    Accepted = 202,
    NoContent = 204,
    PartialContent = 206,

    MovedPermanently = 301,
    NotModified = 304,

    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    RequestTimeout = 408,
    Conflict = 409,
    Gone = 410,
    TooManyRequests = 429,

    InternalServerError = 500,
    NotImplemented = 501,
    BadGateway = 502,
    ServiceUnavailable = 503,
    GatewayTimeout = 504,

    /// The request failed for an unknown reason before producing a response.
    UnknownFailure = 520,
    /// The request was canceled before completion.
    Canceled = 521,
    /// A connection to the replica could not be established.
    ConnectFailure = 522,
    /// The connection dropped while sending the request.
    SendFailure = 523,
    /// The connection dropped while receiving the response.
    ReceiveFailure = 524,
}

impl ResponseCode {
    /// Converts a raw wire status code.
    ///
    /// Codes outside the known space collapse to `Unknown` rather than
    /// failing: the classifier must always have something to look at.
    pub fn from_u16(code: u16) -> Self {
        match code {
            200 => Self::Ok,
            201 => Self::Created,
            202 => Self::Accepted,
            204 => Self::NoContent,
            206 => Self::PartialContent,
            301 => Self::MovedPermanently,
            304 => Self::NotModified,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            408 => Self::RequestTimeout,
            409 => Self::Conflict,
            410 => Self::Gone,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            501 => Self::NotImplemented,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            520 => Self::UnknownFailure,
            521 => Self::Canceled,
            522 => Self::ConnectFailure,
            523 => Self::SendFailure,
            524 => Self::ReceiveFailure,
            _ => Self::Unknown,
        }
    }

    /// Numeric value of the code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// True for 2xx codes.
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// True for 4xx codes.
    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// True for 5xx codes, excluding the synthetic range.
    pub fn is_server_error(self) -> bool {
        (500..520).contains(&self.as_u16())
    }

    /// True for codes that never came off the wire: `Unknown` and the
    /// `520+` block.
    pub fn is_synthetic(self) -> bool {
        self == Self::Unknown || self.as_u16() >= 520
    }

    /// True for synthetic codes describing a transport-level failure.
    pub fn is_network_failure(self) -> bool {
        matches!(
            self,
            Self::UnknownFailure | Self::ConnectFailure | Self::SendFailure | Self::ReceiveFailure
        )
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.as_u16(), self)
    }
}
