//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `init` - Scaffold the project and run the packaging tools
//! - `scaffold` - Scaffold only
//! - `preflight` - Run preflight checks
//! - `clean` - Remove the project directory
//! - `show` - Display information

pub mod clean;
pub mod init;
mod preflight;
pub mod scaffold;
pub mod show;

pub use clean::cmd_clean;
pub use init::{cmd_init, InitOptions};
pub use preflight::cmd_preflight;
pub use scaffold::cmd_scaffold;
pub use show::cmd_show;
