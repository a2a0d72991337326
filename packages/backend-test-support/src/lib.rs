//! Backend test support utilities
//!
//! Shared helpers for backend tests, currently limited to unified logging
//! initialization so unit and integration tests report through the same
//! subscriber configuration.

pub mod test_logging;
