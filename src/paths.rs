//! Default on-disk locations.
//!
//! Follows the XDG base directory layout.

use std::env;
use std::path::PathBuf;

/// Get the XDG data directory for microblog.
///
/// `$XDG_DATA_HOME/microblog`, falling back to `~/.local/share/microblog`,
/// and to `./microblog` when neither variable is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|_| PathBuf::from("."));

    data_home.join("microblog")
}

/// Get the default database file path (data_dir/microblog.db).
pub fn get_db_path() -> PathBuf {
    get_data_dir().join("microblog.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_ends_with_app_name() {
        // env vars are unreliable in parallel tests; only check the suffix
        let path = get_data_dir();
        assert!(path.ends_with("microblog"));
    }

    #[test]
    fn test_get_db_path_ends_with_db_file() {
        let path = get_db_path();
        assert!(path.ends_with("microblog/microblog.db"));
    }
}
