pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::{GeminiClient, GeminiClientFactory};
pub use config::{CliArgs, Settings};
pub use core::detector::{detect_mention, fuzzy_ratio, is_mentioned, FUZZY_THRESHOLD};
pub use core::{probe::ModelProbe, results::ResultsLog, service::BrandCheckService};
pub use domain::model::{CheckOutcome, DetectionResult};
pub use server::{build_router, AppState};
pub use utils::error::{CheckError, Result};
