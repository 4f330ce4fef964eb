//! Text helpers shared by the renderer and input handling.
//!
//! ```
//! use prepdeck::util::{display_width, truncate_to_width};
//!
//! assert_eq!(display_width("日本"), 4);
//! assert_eq!(truncate_to_width("What is the virtual DOM?", 10), "What is...");
//! ```

mod text;

pub use text::{display_width, sanitize_search_term, strip_control_chars, truncate_to_width};

/// Maximum search term length in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
