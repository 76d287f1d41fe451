pub mod error;
pub mod fs;
pub mod path;
pub mod system;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
