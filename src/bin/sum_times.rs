use cara::utils::{logger, validation::Validate};
use cara::{AggregatorArgs, CaraError, EtlEngine, LocalStorage, TimeSumPipeline};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = AggregatorArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    // 驗證參數
    if let Err(e) = args.validate() {
        fail(&args, e);
    }

    let pipeline = TimeSumPipeline::new(LocalStorage::default(), args.pgn_file.clone());
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(total) => println!("{}", total),
        Err(e) => fail(&args, e),
    }
}

fn fail(args: &AggregatorArgs, e: CaraError) -> ! {
    tracing::debug!("sum_times failed: {:?}", e);
    match &e {
        CaraError::Io(io) => eprintln!("error: {}: {}", args.pgn_file, io),
        _ => eprintln!("error: {}", e),
    }
    std::process::exit(e.exit_code());
}
