//! Pagination stop reasons
//!
//! Every pagination loop ends with exactly one of these. None of them is an
//! error: the loop always hands back whatever it accumulated.

use std::fmt;

/// Why a pagination loop stopped requesting pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStop {
    /// The accumulator reached its ceiling
    CapReached,

    /// The last page carried no continuation cursor
    CursorExhausted,

    /// The last page carried no items (page-numbered endpoints only)
    EmptyPage,

    /// The last page could not be interpreted
    Malformed,

    /// The configured page ceiling was hit
    PageLimit,

    /// A request failed in a way the caller chose to tolerate
    RequestFailed,
}

impl PageStop {
    /// Returns true if the loop ended on a bad page or request
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Self::Malformed | Self::RequestFailed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapReached => "cap_reached",
            Self::CursorExhausted => "cursor_exhausted",
            Self::EmptyPage => "empty_page",
            Self::Malformed => "malformed",
            Self::PageLimit => "page_limit",
            Self::RequestFailed => "request_failed",
        }
    }
}

impl fmt::Display for PageStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
