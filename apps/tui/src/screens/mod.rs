//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic.

mod convert;
mod entries;

use std::fmt;

pub(crate) use convert::ConvertScreen;
pub(crate) use entries::EntriesScreen;

/// Screen identifiers, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Convert,
    Entries,
}

impl ScreenId {
    pub(crate) const ALL: [ScreenId; 2] = [ScreenId::Convert, ScreenId::Entries];
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert => write!(f, "转换"),
            Self::Entries => write!(f, "条目"),
        }
    }
}
