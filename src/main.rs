// src/main.rs

use svcrun::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("svcrun error: {err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run_main() -> svcrun::errors::Result<i32> {
    let args = cli::parse();
    logging::init_logging()?;
    let exit = run(args).await?;
    Ok(exit.exit_code())
}
