use std::{
    io,
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use tracing::{
    error,
    info,
};
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use wordpack::{
    anki::{
        Choice,
        SystemClock,
    },
    config::{
        Settings,
        SettingsOverrides,
    },
    parser::Encoding,
    run_import,
    ImportRequest,
    WordpackError,
};

#[derive(Parser, Debug)]
#[command(name = "wordpack")]
#[command(about = "Add a bilingual wordlist to an Anki package as new cards")]
#[command(version)]
struct Args {
    /// Wordlist, one "word<DELIMITER>translation" per line
    wordlist: PathBuf,

    /// Anki package (.apkg) to add the cards to
    apkg: PathBuf,

    /// Separator between word and translation [default: " - "]
    delimiter: Option<String>,

    /// Note type to use: an index from the list, or id:<ID>
    #[arg(short, long)]
    model: Option<Choice>,

    /// Deck to add the cards to: an index from the list, or id:<ID>
    #[arg(short, long)]
    deck: Option<Choice>,

    /// Output package [default: cards<timestamp>.apkg]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Wordlist encoding: auto, utf8, utf16le or utf16be
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Keep the wordlist's letter case instead of lowercasing it
    #[arg(long)]
    keep_case: bool,

    /// Position of the new cards in the new-card queue
    #[arg(long)]
    due: Option<i64>,

    /// Build the cards and list them without writing a package
    #[arg(long)]
    dry_run: bool,

    /// Settings file [default: <data dir>/wordpack/settings.json]
    #[arg(long, env = "WORDPACK_CONFIG")]
    config: Option<PathBuf>,

    /// Store this run's delimiter, encoding, case and due options as defaults
    #[arg(long)]
    save_settings: bool,
}

fn run(args: Args) -> Result<(), WordpackError> {
    let settings_path = args.config.clone().unwrap_or_else(Settings::default_path);
    let overrides = SettingsOverrides {
        delimiter: args.delimiter.clone(),
        encoding: args.encoding,
        keep_case: args.keep_case,
        new_card_due: args.due,
    };
    let settings = Settings::load(&settings_path).apply(&overrides);

    if args.save_settings {
        settings.save(&settings_path)?;
    }

    let request = ImportRequest {
        wordlist: args.wordlist,
        apkg: args.apkg,
        output: args.output,
        model: args.model,
        deck: args.deck,
        dry_run: args.dry_run,
        settings,
    };

    let stdin = io::stdin();
    let report = run_import(
        &request,
        SystemClock,
        rand::rng(),
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;
    info!("Added {} cards to '{}' ({})", report.added, report.deck.name, report.model.name);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordpack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
