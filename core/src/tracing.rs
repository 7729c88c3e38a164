//! Debug events for statements and batch casts.
//!
//! The macros expand in the calling crate and check that crate's `tracing`
//! feature, so every crate that uses them declares one.

/// One event per statement sent to the driver.
///
/// ```ignore
/// crampon_trace_query!(&statement.sql, statement.params.len());
/// ```
#[macro_export]
macro_rules! crampon_trace_query {
    ($sql:expr, $params:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "crampon::query", sql = %$sql, params = $params);
    };
}

/// One event per batch handed to the caster.
#[macro_export]
macro_rules! crampon_trace_cast {
    ($rows:expr, $descriptors:expr, $parallel:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "crampon::cast",
            rows = $rows,
            descriptors = $descriptors,
            parallel = $parallel,
        );
    };
}
