#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    blobby_server::start_server().await
}
