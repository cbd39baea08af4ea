//! Subcommand implementations. The CLI layer only handles presentation; the
//! work itself happens in `upkeep_core`.

pub mod auto;
pub mod list;
pub mod menu;
pub mod run;
