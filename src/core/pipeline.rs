use std::{
    io::{
        BufRead,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
    time::Instant,
};

use rand::Rng;
use tracing::info;

use super::WordpackError;
use crate::{
    anki::{
        select,
        BatchImporter,
        Choice,
        Clock,
        Deck,
        IdAllocator,
        Model,
    },
    collection::Collection,
    config::Settings,
    package::Package,
    parser::read_wordlist,
    prompt::prompt_choice,
};

#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub wordlist: PathBuf,
    pub apkg: PathBuf,
    pub output: Option<PathBuf>,
    pub model: Option<Choice>,
    pub deck: Option<Choice>,
    pub dry_run: bool,
    pub settings: Settings,
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub added: usize,
    pub model: Model,
    pub deck: Deck,
    /// `None` for dry runs.
    pub output: Option<PathBuf>,
}

pub fn default_output_path<C: Clock>(settings: &Settings, clock: &C) -> PathBuf {
    let dir = settings.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    dir.join(format!("cards{}.apkg", clock.now_millis()))
}

fn choose<'a, T, I: BufRead, W: Write>(
    items: &'a [T],
    preset: Option<Choice>,
    title: &str,
    label: impl Fn(&T) -> String,
    input: &mut I,
    output: &mut W,
) -> Result<&'a T, WordpackError>
where
    T: crate::anki::types::Identified,
{
    let choice = match preset {
        Some(choice) => choice,
        None if items.is_empty() => return Err(WordpackError::NoChoices(T::KIND)),
        None => {
            let labels: Vec<String> = items.iter().map(label).collect();
            Choice::Index(prompt_choice(input, output, title, &labels)?)
        }
    };
    select(items, choice)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Reads the wordlist, adds one note and card per entry to the package's
/// collection and writes the result to a new package.
pub fn run_import<C: Clock, R: Rng, I: BufRead, W: Write>(
    request: &ImportRequest,
    clock: C,
    rng: R,
    input: &mut I,
    output: &mut W,
) -> Result<ImportReport, WordpackError> {
    let total_start = Instant::now();

    // A bad wordlist aborts before the package is touched.
    let entries = read_wordlist(&request.wordlist, &request.settings.wordlist_options())?;
    info!("Read {} entries from {}", entries.len(), request.wordlist.display());

    let destination = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request.settings, &clock));
    if same_file(&destination, &request.apkg) {
        return Err(WordpackError::Custom(format!(
            "Refusing to overwrite the input package {}",
            request.apkg.display()
        )));
    }

    let package = Package::extract(&request.apkg)?;
    let (model, deck, batch) = {
        let mut collection = Collection::open(&package.collection_path()?)?;

        let models = collection.models()?;
        let model =
            choose(&models, request.model, "Choose a card template:", Model::label, input, output)?
                .clone();
        let decks = collection.decks()?;
        let deck =
            choose(&decks, request.deck, "Choose a deck:", |d: &Deck| d.name.clone(), input, output)?
                .clone();
        info!("Using note type '{}' ({}) and deck '{}' ({})", model.name, model.id, deck.name, deck.id);

        let ids = match collection.max_ids()? {
            Some(floor) => IdAllocator::starting_after(clock, floor),
            None => IdAllocator::new(clock),
        };
        let mut importer = BatchImporter::new(ids, rng, collection.existing_guids()?)
            .with_new_card_due(request.settings.new_card_due);
        let batch = importer.import(&entries, model.id, deck.id)?;

        for entry in &entries {
            writeln!(output, "Adding card ({} => {})", entry.front, entry.back)?;
        }

        if !request.dry_run {
            collection.insert_batch(&batch)?;
        }
        (model, deck, batch)
    };

    if request.dry_run {
        writeln!(output, "Dry run: {} cards prepared, nothing written", batch.len())?;
        return Ok(ImportReport { added: batch.len(), model, deck, output: None });
    }

    let saved = package.repack(&destination)?;
    writeln!(output, "Saved to {}", saved.display())?;
    info!("Import completed ({:.1}s)", total_start.elapsed().as_secs_f32());

    Ok(ImportReport { added: batch.len(), model, deck, output: Some(saved) })
}
