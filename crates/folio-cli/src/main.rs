use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use folio_editor_core::html::parse_fragment;
use folio_editor_core::{
    ContentEditor, EditorConfig, EditorError, EditorEvent, NoticeLevel, RecordingNotifier,
    Sanitizer, execute_event,
};
use miette::{IntoDiagnostic, Result};

#[derive(Parser)]
#[command(version, about = "Folio - dual-mode HTML content editor", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded editing session and print every change
    Replay {
        /// JSON array of editor events
        script: PathBuf,

        /// HTML file holding the initial form value
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Editor config (.toml or .json)
        #[arg(long, env = "FOLIO_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Sanitize an HTML file the way pasted markup is cleaned
    Sanitize {
        /// HTML file to clean
        file: PathBuf,

        /// Also strip inline style attributes
        #[arg(long)]
        no_styles: bool,

        /// Fail on an unterminated tag, comment or attribute instead of
        /// treating it as text
        #[arg(long)]
        strict: bool,
    },
    /// List the text color palette
    Palette {
        /// Editor config (.toml or .json)
        #[arg(long, env = "FOLIO_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            seed,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let seed = match seed {
                Some(path) => Some(tokio::fs::read_to_string(&path).await.into_diagnostic()?),
                None => None,
            };
            replay(&script, seed.as_deref(), config).await?;
        }
        Commands::Sanitize {
            file,
            no_styles,
            strict,
        } => {
            let html = tokio::fs::read_to_string(&file).await.into_diagnostic()?;
            if strict {
                parse_fragment(&html).map_err(EditorError::from)?;
            }
            let sanitizer = if no_styles {
                Sanitizer::new().without_inline_styles()
            } else {
                Sanitizer::new()
            };
            println!("{}", sanitizer.sanitize(&html));
        }
        Commands::Palette { config } => {
            let config = load_config(config.as_deref())?;
            for color in &config.palette {
                println!("{:<12} {}", color.name, color.value);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => Ok(EditorConfig::load(path).map_err(EditorError::from)?),
        None => Ok(EditorConfig::default()),
    }
}

async fn replay(script: &Path, seed: Option<&str>, config: EditorConfig) -> Result<()> {
    let source = tokio::fs::read_to_string(script).await.into_diagnostic()?;
    let events: Vec<EditorEvent> = serde_json::from_str(&source).into_diagnostic()?;
    tracing::info!("replaying {} events from {}", events.len(), script.display());

    let notices = Rc::new(RecordingNotifier::new());
    let mut editor = ContentEditor::new(config).with_notifier(notices.clone());

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    editor.subscribe(move |content: &str| sink.borrow_mut().push(content.to_owned()));

    if let Some(seed) = seed {
        editor.initialize(seed);
    }

    for (index, event) in events.iter().enumerate() {
        execute_event(&mut editor, event);

        for content in changes.borrow_mut().drain(..) {
            println!("[{index}] change: {content}");
        }
        for notice in notices.take() {
            let level = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Error => "error",
            };
            println!("[{index}] {level}: {}", notice.message);
        }
    }

    println!("---");
    println!("{}", editor.content());
    Ok(())
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
