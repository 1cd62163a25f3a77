//! Station finder: the geocode → rank → route chain behind a search.
//!
//! All inputs (address, bike modes, table snapshot) are explicit
//! arguments; nothing is read from shared mutable state.

mod error;
mod search;


pub use error::{FinderError, Stage};
pub use search::{Finder, FinderConfig, SearchOutcome, UserQuery};

pub(crate) use search::bounded;
