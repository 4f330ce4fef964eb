//! Terminal study deck for frontend interview questions.
//!
//! Loads a question set once at startup, then browses it with a live
//! search, category filter and fixed-size pages. Answers are Markdown and
//! expand inline like an accordion. The light/dark theme choice is kept in a
//! small SQLite preference store.

pub mod app;
pub mod config;
pub mod engine;
pub mod keybindings;
pub mod loader;
pub mod question;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
