pub mod assessment;
pub mod case;
pub mod config;
pub mod error;
pub mod export;
pub mod guide;
pub mod tui;
pub mod utils;

pub use assessment::{Assessment, EligibilityEvaluator, Verdict};
pub use case::{CaseSession, CustomerCase};
pub use config::Config;
pub use error::{CheckError, Result};
