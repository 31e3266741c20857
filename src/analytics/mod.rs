//! Activity logging for dashboard fetches.
//!
//! Every fetch attempt is recorded as one JSON line; the reporter folds the
//! log into a summary for `resonanze history`.

pub mod logger;
pub mod reporter;
