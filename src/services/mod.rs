//! Row shaping between fetch and export
//!
//! - `transform`: raw Graph entries to flat report rows
//! - `filter`: the optional user substring filter

pub mod filter;
pub mod transform;

pub use filter::filter_by_user;
pub use transform::{join_location, to_record, to_records};
