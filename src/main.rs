#[tokio::main]
async fn main() {
    if let Err(e) = applog::cli::run().await {
        eprintln!("applog: {}", e);
        std::process::exit(1);
    }
}
