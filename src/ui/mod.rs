//! Terminal User Interface module.
//!
//! This module provides the TUI for browsing interview questions, including:
//! - Main event loop (`run`)
//! - Input handling for the question list and the search bar
//! - Rendering for the browse screen and help overlay
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Screen layout and dispatch
//! - `helpers` - Task spawning and web search URLs
//! - `header` - Title, tagline and preparation note
//! - `search` - Search bar widget
//! - `categories` - Category chip bar
//! - `questions` - Summary line and question accordion
//! - `markdown` - Answer Markdown to styled lines
//! - `pagination` - Page strip widget
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod categories;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
pub mod markdown;
mod pagination;
mod questions;
mod render;
mod search;
mod status;

pub use loop_runner::{run, Action};
