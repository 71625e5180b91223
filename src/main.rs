#[tokio::main]
async fn main() -> anyhow::Result<()> {
    labflag::run().await
}
