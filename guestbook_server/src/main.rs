use guestbook_server::run_with_config;

#[tokio::main]
async fn main() {
    // Startup failures are already logged by the server bootstrap.
    if run_with_config().await.is_err() {
        std::process::exit(1);
    }
}
