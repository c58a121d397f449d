#[tokio::main]
async fn main() -> Result<(), medibot_lib::StartupError> {
    medibot_lib::run().await
}
