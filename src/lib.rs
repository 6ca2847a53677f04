pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, SearchPathResolver, TokioProcessRunner};
pub use app::pipelines::{AdjudicationPipeline, TimeSumPipeline};
pub use config::{AggregatorArgs, AnalyzerArgs, LauncherArgs, TournamentPlan};
pub use self::core::{etl::EtlEngine, launcher::TournamentLauncher};
pub use utils::error::{CaraError, Result};
