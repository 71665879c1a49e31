use clap::Parser;
use sandtree::cli::{self, Args};
use sandtree::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = args.load_config()?;
    logging::init(&config.log);

    let output = cli::run(&args, config).await?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
