#[tokio::main]
async fn main() {
    appleverse_backend::start_web_server().await;
}
