//! Assertion macros for `Result`-returning operations.
//!
//! - [`crate::assert_result_ok!`] - Assert Result is Ok and extract value
//! - [`crate::assert_result_err!`] - Assert Result is Err and extract error
//! - [`crate::assert_contains_error!`] - Assert error message contains pattern

/// Assert that a Result is Ok and extract the value.
///
/// ```rust,ignore
/// let value = assert_result_ok!(store.backend().get_item("k"));
/// ```
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "{}: Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                format!($($msg)+),
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

/// Assert that a Result is Err and extract the error.
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err, got Ok: {:?}\n  at {}:{}:{}",
                value,
                file!(),
                line!(),
                column!()
            ),
            Err(e) => e,
        }
    };
}

/// Assert that the error's Display text contains `pattern`.
#[macro_export]
macro_rules! assert_contains_error {
    ($result:expr, $pattern:expr) => {{
        let err = $crate::assert_result_err!($result);
        let err_str = err.to_string();
        assert!(
            err_str.contains($pattern),
            "Error '{}' does not contain '{}'\n  at {}:{}:{}",
            err_str,
            $pattern,
            file!(),
            line!(),
            column!()
        );
        err
    }};
}

#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};

    #[test]
    fn test_result_macros() {
        let ok: Result<u32> = Ok(3);
        assert_eq!(crate::assert_result_ok!(ok), 3);

        let err: Result<u32> = Err(Error::Configuration("bad poll section".into()));
        let err = crate::assert_contains_error!(err, "poll section");
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    #[should_panic(expected = "Expected Ok")]
    fn test_result_ok_panics_on_err() {
        let err: Result<u32> = Err(Error::Host("gone".into()));
        crate::assert_result_ok!(err);
    }
}
