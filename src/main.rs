use clap::Parser;
use log::LevelFilter;

mod args;
mod rcv;

fn main() {
    let args = args::Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = rcv::run_election(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
