#[tokio::main]
async fn main() {
    staff_session::run().await;
}
