use std::path::PathBuf;

use nix::unistd::getuid;

/// Real user id of the running process.
pub fn current_uid() -> u32 {
    getuid().as_raw()
}

/// Base temporary directory, honouring `TMPDIR`.
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Per-user scratch directory for a temporary sync database.
///
/// The `checkup-db-<uid>` name matches pacman-contrib's `checkupdates`, so both tools share the
/// already downloaded repository indexes.
pub fn checkup_db_dir(uid: u32) -> PathBuf {
    temp_dir().join(format!("checkup-db-{uid}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::with_env;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_checkup_db_dir_honours_tmpdir() {
        with_env(vec![("TMPDIR", "/var/tmp")], || {
            assert_eq!(checkup_db_dir(1000), PathBuf::from("/var/tmp/checkup-db-1000"));
        });
    }

    #[test]
    fn test_current_uid_matches_nix() {
        assert_eq!(current_uid(), nix::unistd::getuid().as_raw());
    }
}
