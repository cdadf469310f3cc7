use std::io::Write;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use marloo_ai::{AnswerEngine, AnswerEvent, OpenAiGenerator};
use marloo_sync::KbClient;

#[derive(Parser)]
#[command(name = "marloo", version, about = "Visa-readiness knowledge-base decision engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream a KB-grounded answer for a visa subclass.
    Ask {
        /// The question to answer.
        query: String,
        /// Visa subclass code, e.g. 500.
        #[arg(long)]
        subclass: String,
        /// Case date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Base URL of the KB service.
        #[arg(long, env = "MARLOO_KB_URL")]
        kb_url: String,
        /// API key for the generation service.
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Generation model name.
        #[arg(long, default_value = "gpt-4o-mini")]
        model: String,
    },
    /// Run the safety linter over a query/answer pair and print the verdict.
    Lint {
        /// User query text (checked for fraud/evasion patterns).
        query: String,
        /// Proposed answer text (checked for forbidden phrases).
        #[arg(long, default_value = "")]
        answer: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("marloo v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    match cli.command {
        Command::Ask {
            query,
            subclass,
            date,
            kb_url,
            api_key,
            model,
        } => {
            let reference_date = date.unwrap_or_else(|| Utc::now().date_naive());
            let store = Arc::new(KbClient::new(kb_url));
            let generator = Arc::new(OpenAiGenerator::new(api_key, model));
            let engine = AnswerEngine::new(store, generator);

            let mut rx = engine.run_grounded_answer(query, subclass, reference_date);
            let mut stdout = std::io::stdout();
            while let Some(event) = rx.recv().await {
                match event {
                    AnswerEvent::Token(token) => {
                        stdout.write_all(token.as_bytes())?;
                        stdout.flush()?;
                    }
                    AnswerEvent::Done(verdict) => {
                        println!();
                        if let Some(refusal) = &verdict.refusal {
                            println!("{refusal}");
                        } else {
                            if !verdict.citations.is_empty() {
                                println!("\nSources: {}", verdict.citations.join("; "));
                            }
                            for warning in &verdict.warnings {
                                println!("Warning: {warning}");
                            }
                            if !verdict.safe {
                                println!("Safety verdict: unsafe");
                                for violation in &verdict.violations {
                                    println!("  - {violation}");
                                }
                            }
                        }
                    }
                    AnswerEvent::Error(message) => {
                        println!();
                        anyhow::bail!(message);
                    }
                }
            }
        }
        Command::Lint { query, answer } => {
            let result = marloo_lint::lint(&query, &answer, &[]);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
