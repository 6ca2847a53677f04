pub mod adjudication;
pub mod etl;
pub mod game_data;
pub mod launcher;
pub mod pgn;
pub mod time_sum;

pub use crate::domain::model::{GameData, Invocation, RunStatus, TimeToken};
pub use crate::domain::ports::{ExecutableResolver, Pipeline, ProcessRunner, Storage};
pub use crate::utils::error::Result;
