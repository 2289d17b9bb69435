//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable giving the root of the software tree.
pub const SW_ROOT_ENV_VAR: &str = "BUG_NAV_SW_ROOT";

/// Retrieve the software root directory from the environment.
///
/// The root is used to resolve the `params` and `sessions` directories.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
