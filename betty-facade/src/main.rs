#[tokio::main]
async fn main() {
    std::process::exit(betty_cli::run().await);
}
