use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use code_tutor::client::{FeedbackClient, FeedbackService};
use code_tutor::config::ServerConfig;
use code_tutor::explorer::FileExplorer;
use code_tutor::llm::OpenAiBackend;
use code_tutor::models::{ChatMessage, Resource};
use code_tutor::resources::{catalog, ResourceMatcher};
use code_tutor::workspace::TutorWorkspace;
use code_tutor::{api, loader};

#[derive(Parser)]
#[command(name = "tutor")]
#[command(about = "AI code tutor: browse files, ask for feedback, find resources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the feedback server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for HTTP API
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
    /// Show a folder as the explorer would
    Tree {
        /// Folder to load
        dir: PathBuf,
    },
    /// Upload files through the feedback service and show the first accepted one
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Ask one question and print the feedback
    Ask {
        /// The question for the tutor
        question: String,

        /// Folder to load into the explorer
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Explorer path of the file to review, e.g. /project/src/main.py
        #[arg(long)]
        file: Option<String>,

        /// Evaluation criteria
        #[arg(long)]
        rubric: Option<String>,
    },
    /// List learning resources for a file, rubric and recent messages
    Resources {
        /// File name or path of the file being worked on
        #[arg(long)]
        file: Option<String>,

        /// Evaluation criteria
        #[arg(long)]
        rubric: Option<String>,

        /// Recent chat messages, oldest first
        messages: Vec<String>,
    },
    /// Interactive chat session
    Chat {
        /// Folder to load into the explorer
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Evaluation criteria
        #[arg(long)]
        rubric: Option<String>,
    },
}

/// Initialize tracing with output to stderr (for interactive modes) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "code_tutor=info,tower_http=debug".into()),
    );

    if use_stderr {
        // Client modes print results on stdout
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_resources(resources: &[&Resource]) {
    println!("Relevant resources:");
    for resource in resources {
        println!("  {} <{}>", resource.title, resource.url);
        println!("    {}", resource.description);
    }
}

fn print_message(message: &ChatMessage) {
    println!("[{}] {}", message.role.as_str(), message.content);
}

fn new_workspace(
    dir: Option<&Path>,
    rubric: Option<String>,
) -> anyhow::Result<TutorWorkspace<FeedbackClient>> {
    let mut workspace = TutorWorkspace::new(FeedbackClient::from_env());
    if let Some(dir) = dir {
        workspace
            .load_folder(dir)
            .with_context(|| format!("Failed to load folder {}", dir.display()))?;
    }
    if let Some(rubric) = rubric {
        workspace.set_rubric(rubric);
    }
    Ok(workspace)
}

async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    let backend = OpenAiBackend::from_env();
    if backend.config().api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; /feedback will return errors");
    }

    let app = api::create_router(Arc::new(backend), &config);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Feedback server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn chat_loop<S: FeedbackService>(workspace: &mut TutorWorkspace<S>) -> anyhow::Result<()> {
    println!("{}", workspace.explorer().render());
    for message in workspace.messages() {
        print_message(message);
    }
    println!("Commands: :tree  :open <path>  :toggle <path>  :rubric <text>  :resources  :quit");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        let (command, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        match command {
            ":quit" | ":q" => break,
            ":tree" => println!("{}", workspace.explorer().render()),
            ":toggle" => {
                workspace.toggle_folder(arg);
                println!("{}", workspace.explorer().render());
            }
            ":open" => {
                if workspace.select_file(arg) {
                    if let Some(selection) = workspace.selection() {
                        println!("--- {} ---\n{}", selection.path, selection.content);
                    }
                } else {
                    println!("No file at {}", arg);
                }
            }
            ":rubric" => {
                workspace.set_rubric(arg);
                println!("Rubric updated");
            }
            ":resources" => print_resources(&workspace.recommendations()),
            "" => {}
            _ => match workspace.send_message(line).await {
                Ok(reply) => print_message(reply),
                Err(e) => println!("{}", e),
            },
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, Commands::Serve { .. });
    init_tracing(use_stderr);

    match cli.command {
        Commands::Serve { host, port } => serve(&host, port).await?,
        Commands::Tree { dir } => {
            let entries = loader::read_folder(&dir)?;
            let mut explorer = FileExplorer::empty();
            explorer.add_files_to_structure(&entries);
            print!("{}", explorer.render());
        }
        Commands::Upload { files } => {
            let mut workspace = new_workspace(None, None)?;
            workspace.upload_files(&files).await?;
            if let Some(selection) = workspace.selection() {
                println!("--- {} ---\n{}", selection.path, selection.content);
            }
        }
        Commands::Ask {
            question,
            dir,
            file,
            rubric,
        } => {
            let mut workspace = new_workspace(dir.as_deref(), rubric)?;
            if let Some(path) = file {
                if !workspace.select_file(&path) {
                    anyhow::bail!("No file at {} in the explorer", path);
                }
            }
            let reply = workspace.send_message(&question).await?;
            println!("{}", reply.content);
            println!();
            print_resources(&workspace.recommendations());
        }
        Commands::Resources {
            file,
            rubric,
            messages,
        } => {
            let messages: Vec<ChatMessage> = messages.into_iter().map(ChatMessage::user).collect();
            let extension = file.as_deref().and_then(code_tutor::resources::extension_of);
            let found = ResourceMatcher::default().recommend(
                extension.as_deref(),
                rubric.as_deref(),
                &messages,
                catalog::builtin(),
            );
            print_resources(&found);
        }
        Commands::Chat { dir, rubric } => {
            let mut workspace = new_workspace(dir.as_deref(), rubric)?;
            chat_loop(&mut workspace).await?;
        }
    }

    Ok(())
}
