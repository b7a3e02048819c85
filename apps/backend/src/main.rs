#[tokio::main]
async fn main() -> anyhow::Result<()> {
    autorevise_backend::run().await
}
