//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! ## Available Repositories
//!
//! - [`SettingsRepository`](settings::SettingsRepository) - `app_meta` key/value rows

pub mod settings;
