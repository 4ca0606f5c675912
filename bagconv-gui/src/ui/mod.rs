//! UI rendering modules.
//!
//! - `control_panel`: Left sidebar with configuration and run controls
//! - `file_list`: Central panel listing the captures
//! - `summary_window`: End-of-run summary

mod control_panel;
mod file_list;
mod summary_window;
