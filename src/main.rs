use anyhow::Result;
use clap::Parser;
use pokedeck::config::relay_url;
use pokedeck::Relay;
use std::collections::HashMap;

/// Drive the chat relay from a terminal against a running pokedeck server
#[derive(Parser, Debug)]
#[command(name = "pokedeck", version)]
struct Args {
    /// Server base URL [default: $POKEDECK_URL, else http://localhost:$PORT]
    #[arg(long)]
    url: Option<String>,

    /// Shared secret sent as x-api-key
    #[arg(long, env = "MY_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Print the Block Kit payload instead of the text
    #[arg(long)]
    blocks: bool,

    /// Press a button instead of running a command: <action_id> <value>
    #[arg(long, num_args = 2, value_names = ["ACTION_ID", "VALUE"])]
    action: Option<Vec<String>>,

    /// Command text, e.g. `search pikachu` or `deck`
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let url = match args.url {
        Some(url) => url,
        None => {
            let vars: HashMap<String, String> = std::env::vars().collect();
            relay_url(&vars)?
        }
    };
    let relay = Relay::new(url, args.api_key)?;

    let message = match args.action.as_deref() {
        Some([action_id, value]) => relay.handle_action(action_id, value).await,
        _ => relay.handle_command(&args.text.join(" ")).await,
    };

    if args.blocks {
        println!("{}", serde_json::to_string_pretty(&message)?);
    } else {
        println!("{}", message.text);
    }

    Ok(())
}
