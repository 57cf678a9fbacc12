use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use aide_agents::code::{self, AnalysisTask};
use aide_agents::error::AgentError;
use aide_agents::event::AgentEvent;
use aide_agents::gemini::GeminiClient;
use aide_agents::{chat, food, video};
use aide_core::credentials::{self, CredentialResolver, OnMissing};
use aide_core::session::SessionStore;

mod repl;

#[derive(Parser)]
#[command(author, version, about = "A hub of Gemini-backed assistants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the aide key store in the current directory
    Init,
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },
    /// Start an interactive chat session
    Chat {
        /// API key for this session, overriding the environment and the store
        #[arg(long)]
        api_key: Option<String>,
        /// The model to use
        #[arg(long)]
        model: Option<String>,
    },
    /// Explain, debug or optimize a code snippet
    Code {
        /// File holding the snippet; read from stdin when omitted
        file: Option<PathBuf>,
        /// What the assistant should do with the snippet
        #[arg(long, value_enum, default_value = "explain")]
        task: TaskArg,
        /// API key for this session, overriding the environment and the store
        #[arg(long)]
        api_key: Option<String>,
        /// The model to use
        #[arg(long)]
        model: Option<String>,
    },
    /// Analyze a meal photo (max 10 MB, jpg/jpeg/png)
    Food {
        /// The image to analyze
        image: PathBuf,
        /// Question to ask instead of the full nutritional breakdown
        #[arg(long)]
        prompt: Option<String>,
        /// API key for this session, overriding the environment and the store
        #[arg(long)]
        api_key: Option<String>,
        /// The model to use
        #[arg(long)]
        model: Option<String>,
    },
    /// Summarize a video (max 200 MB, mp4/mov/avi)
    Video {
        /// The video to summarize
        video: PathBuf,
        /// What you would like to know about the video
        #[arg(short, long)]
        query: String,
        /// API key for this session, overriding the environment and the store
        #[arg(long)]
        api_key: Option<String>,
        /// The model to use
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Store an API key, prompting when no value is given
    Set {
        /// The key to store
        value: Option<String>,
    },
    /// Remove the stored key
    Rm,
    /// Show whether a key is stored
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TaskArg {
    Explain,
    Debug,
    Optimize,
}

impl From<TaskArg> for AnalysisTask {
    fn from(task: TaskArg) -> Self {
        match task {
            TaskArg::Explain => AnalysisTask::Explain,
            TaskArg::Debug => AnalysisTask::Debug,
            TaskArg::Optimize => AnalysisTask::Optimize,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let current_path = match env::current_dir() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: Failed to get current directory - {}", e);
            std::process::exit(1);
        }
    };

    match &cli.command {
        Commands::Init => match aide_core::initialize_project(&current_path) {
            Ok(_) => println!("Successfully initialized the aide key store in ./.aide"),
            Err(e) => {
                eprintln!("Error: Failed to initialize - {}", e);
                std::process::exit(1);
            }
        },
        Commands::Key { action } => handle_key(&current_path, action),
        Commands::Chat { api_key, model } => {
            handle_chat(&current_path, api_key.clone(), model.clone()).await
        }
        Commands::Code {
            file,
            task,
            api_key,
            model,
        } => {
            handle_code(
                &current_path,
                file.clone(),
                (*task).into(),
                api_key.clone(),
                model.clone(),
            )
            .await
        }
        Commands::Food {
            image,
            prompt,
            api_key,
            model,
        } => {
            handle_food(
                &current_path,
                image,
                prompt.clone(),
                api_key.clone(),
                model.clone(),
            )
            .await
        }
        Commands::Video {
            video,
            query,
            api_key,
            model,
        } => {
            handle_video(
                &current_path,
                video,
                query.clone(),
                api_key.clone(),
                model.clone(),
            )
            .await
        }
    }
}

fn handle_key(base_path: &Path, action: &KeyCommand) {
    if let Err(e) = aide_core::verify_project_initialized(base_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match action {
        KeyCommand::Set { value } => {
            match credentials::set_stored_key(base_path, value.clone()) {
                Ok(_) => println!("API key stored successfully."),
                Err(e) => {
                    eprintln!("Error: Failed to store the key - {}", e);
                    std::process::exit(1);
                }
            }
        }
        KeyCommand::Rm => match credentials::clear_stored_key(base_path) {
            Ok(true) => println!("Stored API key removed."),
            Ok(false) => println!("No stored key to remove."),
            Err(e) => {
                eprintln!("Error: Failed to remove the key - {}", e);
                std::process::exit(1);
            }
        },
        KeyCommand::Status => match credentials::read_stored_key(base_path) {
            Ok(Some(_)) => println!("A key is stored."),
            Ok(None) => println!("No key stored."),
            Err(e) => {
                eprintln!("Error: Failed to read the key store - {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Resolves the credential for one invocation, exiting with a message when
/// the policy says the page cannot start without one.
fn resolve_key_or_exit(
    base_path: &Path,
    session_override: Option<&str>,
    on_missing: OnMissing,
) -> String {
    let resolver = CredentialResolver::new(base_path);
    match resolver.resolve(session_override, on_missing) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_chat(base_path: &Path, api_key: Option<String>, model: Option<String>) {
    let mut store = SessionStore::new();
    let session_id = store.create();
    store.get_mut(&session_id).unwrap().api_key_override = api_key;

    let session_override = store
        .get(&session_id)
        .and_then(|s| s.api_key_override.clone());
    let key = resolve_key_or_exit(base_path, session_override.as_deref(), OnMissing::Prompt);

    let client =
        GeminiClient::new(key).with_model(model.unwrap_or_else(|| chat::CHAT_MODEL.to_string()));

    if let Err(e) = repl::run(&client, &mut store, &session_id).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn handle_code(
    base_path: &Path,
    file: Option<PathBuf>,
    task: AnalysisTask,
    api_key: Option<String>,
    model: Option<String>,
) {
    let snippet = match &file {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: Failed to read {} - {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error: Failed to read stdin - {}", e);
                std::process::exit(1);
            }
            buffer
        }
    };

    let key = resolve_key_or_exit(base_path, api_key.as_deref(), OnMissing::Prompt);
    let client =
        GeminiClient::new(key).with_model(model.unwrap_or_else(|| code::CODE_MODEL.to_string()));

    let mut store = SessionStore::new();
    let session_id = store.create();
    let session = store.get_mut(&session_id).unwrap();

    let mut printed = 0usize;
    let mut on_event = |event: AgentEvent| match event {
        AgentEvent::Dispatching => {
            println!("{}", "Analyzing your code...".dimmed());
        }
        AgentEvent::Streaming { partial } => {
            print!("{}", &partial[printed..]);
            let _ = io::stdout().flush();
            printed = partial.len();
        }
        _ => {}
    };

    let result = code::run_code_analysis(&client, session, &snippet, task, &mut on_event).await;
    drop(on_event);
    if printed > 0 {
        println!();
    }
    finish_or_exit(result.map(|_| ()), "code analysis");
}

async fn handle_food(
    base_path: &Path,
    image: &Path,
    prompt: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
) {
    // The analyzer cannot run without a credential, so resolve before
    // touching the image.
    let key = resolve_key_or_exit(base_path, api_key.as_deref(), OnMissing::Fail);

    let asset = match aide_core::assets::load_asset(image) {
        Ok(asset) => asset,
        Err(e) => {
            eprintln!("Error: Failed to read image - {}", e);
            std::process::exit(1);
        }
    };

    let client =
        GeminiClient::new(key).with_model(model.unwrap_or_else(|| food::VISION_MODEL.to_string()));

    let mut on_event = |event: AgentEvent| {
        if event == AgentEvent::Dispatching {
            println!("{}", "Analyzing your meal...".dimmed());
        }
    };

    let result = food::run_food_analysis(&client, &asset, prompt.as_deref(), &mut on_event).await;
    match result {
        Ok(analysis) => {
            println!("{}", "Analysis Result".bold());
            println!("{}", analysis);
        }
        Err(e) => report_failure_and_exit(e, "food analysis"),
    }
}

async fn handle_video(
    base_path: &Path,
    video_path: &Path,
    query: String,
    api_key: Option<String>,
    model: Option<String>,
) {
    let key = resolve_key_or_exit(base_path, api_key.as_deref(), OnMissing::Fail);

    let asset = match aide_core::assets::load_asset(video_path) {
        Ok(asset) => asset,
        Err(e) => {
            eprintln!("Error: Failed to read video - {}", e);
            std::process::exit(1);
        }
    };

    let client =
        GeminiClient::new(key).with_model(model.unwrap_or_else(|| video::VIDEO_MODEL.to_string()));

    let mut announced_processing = false;
    let mut on_event = |event: AgentEvent| match event {
        AgentEvent::Uploading => println!("{}", "Uploading video...".dimmed()),
        AgentEvent::Processing => {
            if !announced_processing {
                announced_processing = true;
                println!("{}", "Processing video...".dimmed());
            }
        }
        AgentEvent::Analyzing => println!("{}", "Analyzing content...".dimmed()),
        _ => {}
    };

    let result =
        video::run_video_summary(&client, &asset, &query, video::POLL_INTERVAL, &mut on_event)
            .await;
    match result {
        Ok(summary) => {
            println!("{}", "Video Analysis".bold());
            println!("{}", summary);
        }
        Err(e) => report_failure_and_exit(e, "video analysis"),
    }
}

fn finish_or_exit(result: Result<(), AgentError>, context: &str) {
    if let Err(e) = result {
        report_failure_and_exit(e, context);
    }
}

/// Rejections are the user's to fix; anything else is logged with context
/// and surfaced as a generic message.
fn report_failure_and_exit(error: AgentError, context: &str) -> ! {
    if error.is_rejection() {
        eprintln!("{}", format!("Warning: {}", error).yellow());
    } else {
        tracing::error!(error = %error, context, "request failed");
        eprintln!(
            "{}",
            "An error occurred while processing the request. Please try again.".red()
        );
    }
    std::process::exit(1);
}
