//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a JSON error body has the given status and message
#[macro_export]
macro_rules! assert_api_error {
    ($response:expr, $status:expr, $message:expr) => {
        let (status, body) = $response;
        assert_eq!(status, $status, "unexpected status, body: {}", body);
        assert_eq!(body["error"], $message, "unexpected error body: {}", body);
    };
}

/// Assert that positions are exactly `0..n`
pub fn assert_dense(positions: &[i64]) {
    let expected: Vec<i64> = (0..positions.len() as i64).collect();
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, expected, "positions are not dense: {:?}", positions);
}
