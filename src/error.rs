//! Error type shared by the loader, the configuration layer and the engine.
//!
//! Every variant is raised before the evolutionary loop starts. A running
//! engine has no recoverable failure modes.

/// Errors raised while loading ratings or preparing a run.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Out-of-range or inconsistent algorithm parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed rating table, or ratings that do not cover the schedule.
    #[error("data error: {0}")]
    Data(String),

    /// Exhaustive seeding requested for a catalog too large to enumerate.
    #[error("exhaustive search infeasible: {catalog} programs exceeds the limit of {limit}")]
    InfeasibleSearch {
        /// Number of programs in the catalog.
        catalog: usize,
        /// Largest catalog the exhaustive strategy accepts.
        limit: usize,
    },

    /// Failure reading a rating source.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ScheduleError::Configuration(msg.into())
    }

    pub(crate) fn data(msg: impl Into<String>) -> Self {
        ScheduleError::Data(msg.into())
    }
}
