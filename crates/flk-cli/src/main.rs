mod ports;
mod script;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flk_config::LoadedForm;
use flk_session::{Ports, Session};
use std::fs;

use crate::ports::{AssumeConfirm, LogFocus, LogNotify, StdinConfirm};
use crate::script::{parse_script, Step};

#[derive(Parser)]
#[command(name = "flk")]
#[command(about = "Field lock-state form workflow CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered form definition hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Build the form and report lint findings
    Check {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Open a session and print every field's resting state
    Fields {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Open a session and dispatch a script of triggers, one per line
    Replay {
        #[command(flatten)]
        form: FormArgs,

        /// Script file
        #[arg(long)]
        script: String,

        /// Answer every confirmation without asking on stdin
        #[arg(long, value_enum)]
        assume: Option<Assume>,
    },
}

#[derive(Args)]
struct FormArgs {
    /// Layered form definition paths in merge order. Built-in proposal form when omitted.
    #[arg(long = "form", env = "FLK_FORM", value_delimiter = ',')]
    paths: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Assume {
    Yes,
    No,
}

fn main() -> Result<()> {
    // Dev-friendly: load .env.local if present
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = flk_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Check { form } => {
            let loaded = load_form(&form)?;
            let spec = loaded.build()?;
            println!("form={}", spec.name);
            println!("config_hash={}", loaded.config_hash);
            println!("fields={}", spec.registry.len());
            println!("rules={}", spec.engine.rules().len());
            for finding in flk_config::lint(&spec) {
                println!("warning={finding}");
            }
        }

        Commands::Fields { form } => {
            let spec = load_form(&form)?.build()?;
            let session = Session::open(spec, Ports::headless());
            for def in session.form().registry.defs() {
                println!(
                    "{} kind={} locked={} value={}",
                    def.id,
                    def.kind.as_str(),
                    session.is_locked(&def.id),
                    session.value(&def.id).unwrap_or("")
                );
            }
        }

        Commands::Replay {
            form,
            script,
            assume,
        } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("failed to read script: {script}"))?;
            let steps = parse_script(&text)?;
            let spec = load_form(&form)?.build()?;

            let ports = match assume {
                Some(Assume::Yes) => Ports::new(AssumeConfirm(true), LogNotify, LogFocus),
                Some(Assume::No) => Ports::new(AssumeConfirm(false), LogNotify, LogFocus),
                None => Ports::new(StdinConfirm, LogNotify, LogFocus),
            };
            let mut session = Session::open(spec, ports);

            for step in steps {
                match step {
                    Step::Dispatch(trigger) => {
                        let fx = session.dispatch(trigger);
                        println!("{}", serde_json::to_string(&fx)?);
                    }
                    Step::Input { field, value } => {
                        let accepted = session.input(&field, value);
                        let line = serde_json::json!({
                            "input": field,
                            "accepted": accepted,
                            "dirty": session.is_dirty(),
                        });
                        println!("{line}");
                    }
                }
            }

            println!("session_id={}", session.session_id());
            println!("dirty={}", session.is_dirty());
            println!("open={}", session.is_open());
            println!(
                "last_committed_at={}",
                session
                    .last_committed_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "null".to_string())
            );
        }
    }

    Ok(())
}

fn load_form(args: &FormArgs) -> Result<LoadedForm> {
    if args.paths.is_empty() {
        return flk_config::builtin_proposal_form();
    }
    let path_refs: Vec<&str> = args.paths.iter().map(|s| s.as_str()).collect();
    flk_config::load_layered_yaml(&path_refs)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
