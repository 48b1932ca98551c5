#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod judge;
pub mod leaderboard;
pub mod progress_store;
pub mod session;
pub mod tutor;

#[cfg(test)]
mod test_support;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProgressError, SessionError, TutorConfigError, TutorError};
pub use judge::{JudgeReport, Verdict};
pub use leaderboard::Timeframe;
pub use progress_store::ProgressStore;
pub use session::SessionManager;
pub use tutor::{GateGuard, RequestGate, TutorConfig, TutorGates, TutorRequest, TutorService};
