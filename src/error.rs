//! Run-level error type.
//!
//! Every fatal condition carries the exit code the process should terminate
//! with, so `main` stays a thin match. The codes partition the failure
//! taxonomy:
//!
//! - 2: configuration problem (missing env var, unreadable sink)
//! - 3: persist failure (sink write / warehouse error)
//! - 4: fetch failure (network, HTTP status, zero rows extracted)
//! - 5: no usable data (all candidates lacked required fields)
//!
//! Per-field parse failures are *not* errors: they are recovered locally as
//! missing values and aggregated into a batch report.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn persist(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn no_usable_data(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
