#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    workout_history::run().await
}
