//! Command implementations for skill-cli

pub mod harness;
pub mod status;
pub mod sync;

pub use harness::{
    run_harness_import, run_harness_list, run_harness_remove, run_harness_status,
    run_harness_sync, run_harness_unlink,
};
pub use status::run_status;
pub use sync::{run_install, run_pull, run_push, run_resolve, run_uninstall};
