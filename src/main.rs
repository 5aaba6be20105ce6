#[tokio::main]
async fn main() {
    if let Err(e) = facility_booking::run().await {
        eprintln!("facility_booking failed: {}", e);
        std::process::exit(1);
    }
}
