use notes_frontend::{
    config,
    handlers::{self, Command},
    repository::HttpNotesApi,
    service::NoteManager,
};

use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    // Log setup, kept off stdout so it does not interleave with the screen
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config file");
    tracing::info!("Successfully loaded notes front-end config");

    let api = HttpNotesApi::new(&cfg.api_base_url, cfg.request_timeout).unwrap_or_else(|e| {
        tracing::error!("Failed to create HTTP client: {e}");
        panic!("failed to create HTTP client: {e}");
    });
    tracing::info!("Using notes store at {}", api.base_url());

    let manager = NoteManager::new(api, cfg.status_reset_delay);
    manager.load_all().await;

    println!("{}", handlers::USAGE);
    println!("{}", handlers::render(&manager.state().await));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read from stdin: {e}");
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                println!("{e}. Type 'help' for the list of commands.");
                continue;
            }
        };

        if let Some(output) = handlers::execute(&manager, command).await {
            println!("{output}");
        }
        println!("{}", handlers::render(&manager.state().await));
    }
}
