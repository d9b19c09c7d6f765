//! End-to-end tests
//!
//! A real listener on an ephemeral port, driven by the board client over
//! HTTP and WebSocket.

mod board_session_test;
mod realtime_test;
