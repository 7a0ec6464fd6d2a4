//! `langsheet_cli` v1:
//! Forward (JSON trees -> CSV + workbook) and reverse (workbook -> JSON trees)
//! runs behind the `langsheet` binary.
//!
//! Modules:
//! - `conf`    : defaults and resolved run settings
//! - `prompt`  : interactive / pre-answered questions
//! - `forward` : forward run
//! - `reverse` : reverse run
//! - `log`     : subscriber setup
pub mod conf;
pub mod forward;
pub mod log;
pub mod prompt;
pub mod reverse;

pub use conf::{SpecForwardOptions, SpecReverseOptions};
pub use forward::run_forward;
pub use log::init_logging;
pub use prompt::{FixedPrompter, Prompter, StdioPrompter};
pub use reverse::run_reverse;
