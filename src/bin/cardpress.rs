use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;

use cardpress::{AssetStore, Batch, CatalogEntry, RenderOptions, TextRasterizer};

#[derive(Parser, Debug)]
#[command(name = "cardpress", version, about = "Batch trading-card compositor")]
struct Cli {
    /// Input catalog JSON (array of card entries).
    #[arg(long)]
    catalog: PathBuf,

    /// Directory holding the nine frame/badge layer PNGs.
    #[arg(long)]
    frames: PathBuf,

    /// Directory holding per-card base illustrations ({texture}.png).
    #[arg(long)]
    textures: PathBuf,

    /// TTF/OTF font used for all card text.
    #[arg(long)]
    font: PathBuf,

    /// Output directory for finished {catalog_id}.png images.
    #[arg(long)]
    out: PathBuf,

    /// Right-align titles narrower than the text column.
    #[arg(long)]
    title_align_right: bool,

    /// Print serial ids (volume kinds 0 and 1 only).
    #[arg(long)]
    print_serial: bool,

    /// Worker thread count (defaults to all cores).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configure worker thread pool")?;
    }

    let file = File::open(&cli.catalog)
        .with_context(|| format!("open catalog '{}'", cli.catalog.display()))?;
    let entries: Vec<CatalogEntry> =
        serde_json::from_reader(BufReader::new(file)).context("parse catalog JSON")?;

    let batch = Batch::from_catalog(entries);

    let font_bytes = std::fs::read(&cli.font)
        .with_context(|| format!("read font '{}'", cli.font.display()))?;
    let glyphs = TextRasterizer::from_bytes(&font_bytes)?;

    let mut assets = AssetStore::load_layers(&cli.frames)?;
    assets.load_textures(&cli.textures, batch.texture_keys());

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output directory '{}'", cli.out.display()))?;

    let opts = RenderOptions {
        title_align_right: cli.title_align_right,
        print_serial: cli.print_serial,
    };
    let (outcomes, stats) = batch.render(&assets, &glyphs, &opts)?;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(image) => {
                let path = cli.out.join(format!("{}.png", outcome.catalog_id));
                image
                    .to_straight_image()
                    .save(&path)
                    .with_context(|| format!("write '{}'", path.display()))?;
                println!("{}.png -> {}.png OK!", outcome.texture, outcome.catalog_id);
            }
            Err(e) => {
                println!(
                    "{}.png -> {}.png NG! ({e})",
                    outcome.texture, outcome.catalog_id
                );
            }
        }
    }

    println!(
        "All done. {} of {} card{} printed.",
        stats.rendered,
        stats.total,
        if stats.total == 1 { "" } else { "s" }
    );
    Ok(())
}
