use anyhow::Result;
use orderflow::cli::App;

#[tokio::main]
async fn main() -> Result<()> {
    let mut app = App::from_args().await?;
    let args = orderflow::cli::Args::parse_args();

    app.run(args).await?;

    Ok(())
}
