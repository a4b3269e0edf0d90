//! clockbot main entrypoint.

use clockbot::run;
use clockbot::ui::messages;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        messages::fault(&e);
        std::process::exit(1);
    }
}
