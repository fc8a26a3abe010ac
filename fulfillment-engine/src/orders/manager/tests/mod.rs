//! Manager scenario tests
//!
//! - **test_core**: facade basics, queries, notifications
//! - **test_flows**: end-to-end lifecycles per order type
//! - **test_boundary**: races, invariants, guard edges
