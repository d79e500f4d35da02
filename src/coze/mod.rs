pub mod client;
pub mod search;
pub mod types;

pub use client::CozeClient;
pub use search::{SearchOutcome, search_notes};
