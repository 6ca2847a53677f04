use crate::adapters::storage::display_path;
use crate::config::{LauncherArgs, TournamentPlan};
use crate::domain::model::{Invocation, RunStatus};
use crate::domain::ports::{ExecutableResolver, ProcessRunner, Storage};
use crate::utils::error::{CaraError, Result};

/// Checks the environment, then hands a fixed tournament to the runner.
///
/// Every check runs before the runner is spawned; nothing is written by the
/// launcher itself.
pub struct TournamentLauncher<S: Storage, R: ProcessRunner, X: ExecutableResolver> {
    storage: S,
    runner: R,
    resolver: X,
    plan: TournamentPlan,
}

impl<S: Storage, R: ProcessRunner, X: ExecutableResolver> TournamentLauncher<S, R, X> {
    pub fn new(storage: S, runner: R, resolver: X, plan: TournamentPlan) -> Self {
        Self {
            storage,
            runner,
            resolver,
            plan,
        }
    }

    pub fn plan(&self) -> &TournamentPlan {
        &self.plan
    }

    pub fn check_dependencies(&self) -> Result<()> {
        for executable in self.plan.required_executables() {
            match self.resolver.resolve(executable) {
                Some(path) => tracing::debug!("Found {} at {}", executable, path.display()),
                None => {
                    return Err(CaraError::DependencyMissing {
                        executable: executable.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Runs every check and builds the runner call without spawning it.
    pub async fn prepare(&self, rounds: u32, pgn_out: &str) -> Result<Invocation> {
        self.check_dependencies()?;

        if self.storage.exists(pgn_out).await? {
            return Err(CaraError::OutputAlreadyExists {
                path: pgn_out.to_string(),
            });
        }

        let book = display_path(&self.plan.opening_book);
        match self.storage.exists(&book).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Opening book not found: {}", book),
            Err(e) => tracing::warn!("Cannot check opening book {}: {}", book, e),
        }

        Ok(self.plan.invocation(rounds, pgn_out))
    }

    pub async fn launch(&self, args: &LauncherArgs) -> Result<RunStatus> {
        let invocation = self.prepare(args.rounds, &args.pgn_out).await?;

        tracing::info!(
            "Starting {} rounds, games go to {}",
            args.rounds,
            args.pgn_out
        );
        let status = self.runner.run(&invocation).await?;

        if !status.success() {
            tracing::warn!("{} exited with {:?}", invocation.program, status.code);
        }
        Ok(status)
    }
}
