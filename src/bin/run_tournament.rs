use cara::utils::{logger, validation::Validate};
use cara::{
    CaraError, LauncherArgs, LocalStorage, SearchPathResolver, TokioProcessRunner,
    TournamentLauncher, TournamentPlan,
};
use clap::Parser;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() {
    let args = LauncherArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    // 驗證參數
    if let Err(e) = args.validate() {
        fail(e);
    }

    let launcher = TournamentLauncher::new(
        LocalStorage::default(),
        TokioProcessRunner,
        SearchPathResolver::from_env(),
        TournamentPlan::with_book_dir(&launcher_dir()),
    );
    tracing::debug!("Tournament plan: {:?}", launcher.plan());

    match launcher.launch(&args).await {
        // 與 cutechess-cli 的退出碼一致
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => fail(e),
    }
}

/// The opening book ships next to the launcher binary.
fn launcher_dir() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => exe.parent().map(Path::to_path_buf).unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Cannot locate the launcher binary ({}), using .", e);
            PathBuf::from(".")
        }
    }
}

fn fail(e: CaraError) -> ! {
    tracing::debug!("run_tournament failed: {:?}", e);
    eprintln!("error: {}", e);
    std::process::exit(e.exit_code());
}
