use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shiftpay_lib::run(shiftpay_lib::cli::Cli::parse()).await
}
