//! # Commands
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── generate.rs  ◄─── Issue a number and write the quotation
//! ├── counter.rs   ◄─── Read-only counter status
//! └── preview.rs   ◄─── Document tree as JSON, nothing issued
//! ```
//!
//! Each command receives the state it needs and a writer for stdout, and
//! returns `Result<(), AppError>`. Logs go to stderr.

pub mod counter;
pub mod generate;
pub mod preview;

use cotizador_core::DocumentComposer;

use crate::state::ConfigState;

/// Composer for the configured letterhead and currency.
pub(crate) fn composer(config: &ConfigState) -> DocumentComposer {
    DocumentComposer::new(config.company.clone(), config.currency.clone())
}
