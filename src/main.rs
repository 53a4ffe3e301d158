use env_logger::Env;
use leethub::cli::{self, Cli};

fn main() {
    let cli = Cli::parse_args();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.format_timestamp(None).init();

    if let Err(e) = cli::run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
