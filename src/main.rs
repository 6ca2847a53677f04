use cara::config::{AnalyzerCommand, RuleTestArgs};
use cara::utils::{logger, validation::Validate};
use cara::{AdjudicationPipeline, AnalyzerArgs, CaraError, EtlEngine, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = AnalyzerArgs::parse();

    // 初始化日誌 (RUST_LOG 可調整等級)
    logger::init_cli_logger(false);

    match args.command {
        AnalyzerCommand::Test(test_args) => run_rule_test(test_args).await,
    }
}

async fn run_rule_test(args: RuleTestArgs) {
    if let Err(e) = args.validate() {
        fail(&args, e);
    }

    let pipeline = match AdjudicationPipeline::from_args(LocalStorage::default(), &args) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&args, e),
    };

    match EtlEngine::new(pipeline).run().await {
        Ok(report) => print!("{}", report),
        Err(e) => fail(&args, e),
    }
}

fn fail(args: &RuleTestArgs, e: CaraError) -> ! {
    tracing::debug!("cara test failed: {:?}", e);
    match &e {
        CaraError::Io(io) => eprintln!("error: {}: {}", args.file, io),
        _ => eprintln!("error: {}", e),
    }
    std::process::exit(e.exit_code());
}
