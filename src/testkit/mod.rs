//! Testing infrastructure for the cleaner.
//!
//! - **[`MockHost`]**: scripted in-memory host implementing every host trait
//! - **Assertion macros**: `assert_result_ok!`, `assert_result_err!` and
//!   `assert_contains_error!`, exported at the crate root
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cache_cleaner::testkit::MockHost;
//! use cache_cleaner::host::StatsGateway;
//!
//! #[tokio::test]
//! async fn test_size() {
//!     let host = MockHost::new().with_sizes([42.0]);
//!     let stats = cache_cleaner::assert_result_ok!(host.cache_stats().await);
//!     assert_eq!(stats.current_size_mb, 42.0);
//! }
//! ```

pub mod assertions;
pub mod mock_env;

pub use mock_env::MockHost;
