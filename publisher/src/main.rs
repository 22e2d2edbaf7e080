#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dexpush_publisher::run().await
}
