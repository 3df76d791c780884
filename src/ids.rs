use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Header carrying the per-call request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Strongly typed request identifier backed by ULID.
///
/// Every bound endpoint call gets a fresh one; it is sent as
/// [`REQUEST_ID_HEADER`] and logged with the request and its response.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(pub ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(RequestId)
    }
}
