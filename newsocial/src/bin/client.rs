/*
newsocial-client - terminal front end for the newsocial service.
Reads commands from stdin, keeps one session of fetched/selected articles and
prints generated content. Every failure is printed inline; the loop keeps going.
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use newsocial::client::repl::{self, Command};
use newsocial::client::session::SessionSettings;
use newsocial::client::{ApiClient, SessionRegistry};

#[derive(Parser, Debug)]
#[command(name = "newsocial-client", about = "Terminal client for the newsocial service")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Service base URL (defaults to [client] base_url, then http://127.0.0.1:$NEWS_API_PORT)
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, default_value = "general")]
    category: String,

    #[arg(long, default_value = "us")]
    country: String,

    #[arg(long, default_value = "twitter")]
    platform: String,

    #[arg(long, default_value = "informative")]
    tone: String,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut config = Config::load_layered(Path::new("."), args.config.as_deref())
        .await
        .context("failed to load configuration")?;
    if let Some(base_url) = args.base_url.clone() {
        config.client.base_url = Some(base_url);
    }

    let client = ApiClient::new(config.client_base_url()?, config.client_timeout())
        .context("failed to build HTTP client")?;

    let registry = SessionRegistry::new();
    let (session_id, session) = registry.create(SessionSettings {
        category: args.category,
        country: args.country,
        platform: args.platform,
        tone: args.tone,
    });

    println!("📰 From Headlines to Hashtags — connected to {}", client.base_url());
    println!("{}", repl::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match repl::parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("⚠ {}", message);
                continue;
            }
        };

        let mut session = session.lock().await;
        match command {
            Command::Empty => {}
            Command::Help => println!("{}", repl::HELP),
            Command::Quit => break,
            Command::Settings => println!("{}", repl::render_settings(&session.settings)),
            Command::Set(setting, value) => {
                repl::apply_setting(&mut session.settings, &setting, value);
                println!("{}", repl::render_settings(&session.settings));
            }
            Command::Health => match client.health().await {
                Ok(health) => println!("✓ {} — {}", health.status, health.message),
                Err(e) => println!("✗ {}", e),
            },
            Command::Fetch => {
                println!("Generating fresh headlines...");
                match session.fetch_news(&client).await {
                    Ok(count) => {
                        println!("✓ Fetched {} fresh articles", count);
                        for (i, article) in session.articles().iter().enumerate() {
                            println!("{}", repl::render_article(i, article));
                        }
                    }
                    Err(e) => println!("✗ {}", e),
                }
            }
            Command::List => {
                if session.articles().is_empty() {
                    println!("No articles yet, run 'fetch'.");
                }
                for (i, article) in session.articles().iter().enumerate() {
                    println!("{}", repl::render_article(i, article));
                }
            }
            Command::Select(index) => match session.select(index) {
                Ok(article) => println!("✓ Selected: {}", article.title),
                Err(e) => println!("✗ {}", e),
            },
            Command::Post => {
                println!("Generating post...");
                print_result(session.generate_post(&client).await);
            }
            Command::Series => {
                println!("Creating series...");
                print_result(session.generate_series(&client).await);
            }
            Command::Analyze => {
                println!("Analyzing...");
                print_result(session.analyze(&client).await);
            }
        }
    }

    registry.remove(&session_id);
    println!("Bye!");
    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_result(result: newsocial::client::ClientResult<String>) {
    match result {
        Ok(text) => println!("\n{}\n", text),
        Err(e) => println!("✗ {}", e),
    }
}
