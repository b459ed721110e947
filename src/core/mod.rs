//! View logic of the help desk pages
//!
//! Everything here is pure: it shapes API data for display and validates
//! form input before a request is sent.

pub mod builders;
mod countdown;
mod display;
mod filter;
mod options;
pub mod time;

pub use builders::{validation, TicketDraft, UserDraft, ROLES};
pub use countdown::{CodeCountdown, DEFAULT_CODE_SECONDS};
pub use display::{AuthorNames, StatusBadge, TicketRow};
pub use filter::{SortOrder, TicketFilter};
pub use options::{
    FormOptions, CATEGORY_OPTIONS_KEY, DEFAULT_CATEGORIES, DEFAULT_FACILITIES,
    FACILITY_OPTIONS_KEY,
};
