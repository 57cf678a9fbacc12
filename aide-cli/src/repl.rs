//! Interactive chat loop over stdin/stdout.

use std::io::{self, Write};

use aide_agents::chat::run_chat_turn;
use aide_agents::event::AgentEvent;
use aide_core::provider::GenerativeProvider;
use aide_core::session::SessionStore;
use colored::Colorize;

/// Runs the chat REPL against one session until the user leaves.
///
/// History lasts only for this session and is capped at the last 20 turns;
/// `/new` starts over, `/quit` (or end of input) leaves.
pub async fn run(
    provider: &dyn GenerativeProvider,
    store: &mut SessionStore,
    session_id: &str,
) -> anyhow::Result<()> {
    println!(
        "{}",
        "Chat history lasts only for this session and keeps the last 20 turns.".dimmed()
    );
    println!(
        "{}",
        "Type a message, '/new' to start over, or '/quit' to leave.".dimmed()
    );

    loop {
        print!("{} ", "you>".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            // End of input.
            println!();
            break;
        }

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                let session = store
                    .get_mut(session_id)
                    .expect("the REPL owns its session");
                session.log.reset();
                println!("{}", "Started a new chat session.".green());
            }
            input => {
                let session = store
                    .get_mut(session_id)
                    .expect("the REPL owns its session");

                let mut printed = 0usize;
                let mut on_event = |event: AgentEvent| match event {
                    AgentEvent::Dispatching => {
                        print!("{} ", "gemini>".magenta().bold());
                        let _ = io::stdout().flush();
                    }
                    AgentEvent::Streaming { partial } => {
                        print!("{}", &partial[printed..]);
                        let _ = io::stdout().flush();
                        printed = partial.len();
                    }
                    _ => {}
                };

                let result = run_chat_turn(provider, session, input, &mut on_event).await;
                drop(on_event);
                if printed > 0 {
                    println!();
                }

                match result {
                    Ok(_) => {}
                    Err(e) if e.is_rejection() => {
                        println!("{}", format!("Warning: {}", e).yellow());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "chat request failed");
                        eprintln!(
                            "{}",
                            "An error occurred while processing the response. Please try again."
                                .red()
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
