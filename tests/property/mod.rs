//! Property-based tests

mod board_state_proptest;
