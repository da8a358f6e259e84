#[tokio::main]
async fn main() {
    if let Err(e) = recommendations_wall::start_server().await {
        eprintln!("Server failed: {e}");
        std::process::exit(1);
    }
}
