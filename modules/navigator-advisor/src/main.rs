use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use navigator_advisor::llm::GeminiClient;
use navigator_advisor::roadmap::generate_learning_roadmap;
use navigator_advisor::{render, Advisor, ChatMemory, TextGenerator};
use navigator_common::{AppConfig, Level, NavigatorError};
use navigator_scout::finder::DEFAULT_MAX_RESULTS;
use navigator_scout::CourseFinder;

#[derive(Parser)]
#[command(name = "navigator", about = "Knowledge Navigator: find online courses and plan a learning path")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Talk to the academic advisor (default)
    Chat,
    /// Search for courses and print them
    Search {
        /// Subject to search for
        topic: Vec<String>,
        /// Beginner, Intermediate, or Advanced
        #[arg(long, default_value = "Beginner")]
        level: String,
        /// Maximum number of courses
        #[arg(short = 'n', long = "max-results", default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Generate a learning roadmap with the model
    Roadmap {
        /// Subject to plan for
        topic: Vec<String>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("navigator=warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn generator_from(config: &AppConfig) -> Result<Option<Arc<dyn TextGenerator>>> {
    let Some(llm) = &config.llm else {
        return Ok(None);
    };
    let generator: Arc<dyn TextGenerator> =
        Arc::new(GeminiClient::new(&llm.gemini_api_key, &llm.gemini_model)?);
    Ok(Some(generator))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => chat(&config).await,
        Command::Search {
            topic,
            level,
            max_results,
            json,
        } => search(&config, &topic.join(" "), Level::parse(&level), max_results, json).await,
        Command::Roadmap { topic } => roadmap(&config, &topic.join(" ")).await,
    }
}

async fn search(config: &AppConfig, topic: &str, level: Level, max_results: usize, json: bool) -> Result<()> {
    let finder = CourseFinder::from_config(&config.search)?;

    let courses = match finder.try_search(topic, level, max_results).await {
        Ok(courses) => courses,
        Err(NavigatorError::EmptyTopic) => {
            println!("no query to run");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else if courses.is_empty() {
        println!("{}", render::no_courses(topic.trim(), level));
    } else {
        print!("{}", render::course_table(&courses));
    }
    Ok(())
}

async fn roadmap(config: &AppConfig, topic: &str) -> Result<()> {
    let Some(generator) = generator_from(config)? else {
        bail!("GEMINI_API_KEY is required for roadmap generation");
    };

    match generate_learning_roadmap(generator.as_ref(), topic).await {
        Ok(text) => println!("{}", text),
        Err(NavigatorError::EmptyTopic) => println!("no query to run"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn chat(config: &AppConfig) -> Result<()> {
    let generator = generator_from(config)?;
    if generator.is_none() {
        warn!("GEMINI_API_KEY not set; answers use the built-in curriculum layout. Live course search still works.");
    }

    let finder = Arc::new(CourseFinder::from_config(&config.search)?);
    let advisor = Advisor::new(finder, generator);
    let mut memory = ChatMemory::new();

    info!(llm = advisor.has_generator(), "Chat session started");

    println!("Welcome to the Knowledge Navigator! I'm your Academic Advisor.");
    println!("Type 'quit' or 'exit' to end, 'reset' to clear memory, 'summary' for session info.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("Thank you for using the Knowledge Navigator. Goodbye!");
                break;
            }
            "reset" => {
                memory.clear();
                println!("Conversation memory cleared.");
                continue;
            }
            "summary" => {
                println!("{}", memory.summary());
                continue;
            }
            _ => {}
        }

        let turn = advisor.respond(input, memory.history()).await;
        println!("\nAdvisor:");
        println!("{}", turn.reply);
        memory.add_exchange(input, &turn.reply);
    }

    Ok(())
}
