//! CLI Module
//!
//! Numbered text menu over the link engine.
//!
//! # Menu
//! - `1` Register
//! - `2` Log in
//! - `3` Create short link
//! - `4` List my links
//! - `5` Follow a link
//! - `6` Edit click limit
//! - `7` Delete link
//! - `8` Log out
//! - `0` Exit

pub mod app;
pub mod menu;
pub mod session;

pub use app::App;
pub use menu::MenuChoice;
pub use session::Session;
