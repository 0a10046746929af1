use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use glyphcollage::collage::{merge_author_buckets, ElementTile};
use glyphcollage::core::CancellationToken;
use glyphcollage::elements::BucketMap;
use glyphcollage::export::{Exporter, JsonExporter};
use glyphcollage::ocr::{JsonOcrSource, OcrEngine, TesseractBridge};
use glyphcollage::pipeline::{
    create_collage, extract_text_and_boxes, generate_element_images, run_comparison,
    PipelineConfig,
};
use glyphcollage::Granularity;

#[derive(Parser, Debug)]
#[command(name = "glyphcollage")]
#[command(version, about = "Compare two handwriting samples letter by letter or word by word", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a juxtaposed collage from two handwriting images
    Compare {
        /// Image of the first author (left column)
        image_a: PathBuf,

        /// Image of the second author (right column)
        image_b: PathBuf,

        /// Compare single letters or word initials
        #[arg(short, long, value_enum, default_value_t = Mode::Letters)]
        mode: Mode,

        #[command(flatten)]
        engine: EngineArgs,

        /// Directory the collage is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// TrueType/OpenType font for the middle column labels
        #[arg(long)]
        font: Option<PathBuf>,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run OCR on one image and write its element records as JSON
    Extract {
        image: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Mode::Letters)]
        mode: Mode,

        #[command(flatten)]
        engine: EngineArgs,

        /// Output directory (default: next to the image)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pack printed tiles of one or two authors' elements into a simple collage
    Gallery {
        image: PathBuf,

        /// Second author to merge in, letter by letter
        #[arg(long)]
        with: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Mode::Letters)]
        mode: Mode,

        #[command(flatten)]
        engine: EngineArgs,

        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// OCR engine producing the text boxes
    #[arg(short, long, value_enum, default_value_t = Engine::Tesseract)]
    engine: Engine,

    /// Path to the tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract_cmd: PathBuf,

    /// Tesseract language code(s)
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode
    #[arg(long)]
    psm: Option<u8>,

    /// Recorded OCR data for the json engine (default: <image>.ocr.json)
    #[arg(long)]
    ocr_json: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Mode {
    Letters,
    Words,
}

impl From<Mode> for Granularity {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Letters => Granularity::Character,
            Mode::Words => Granularity::Word,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Engine {
    Tesseract,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compare {
            image_a,
            image_b,
            mode,
            engine,
            output,
            font,
            quiet,
        } => compare(image_a, image_b, mode.into(), &engine, output, font, quiet),
        Commands::Extract {
            image,
            mode,
            engine,
            output,
        } => extract(image, mode.into(), &engine, output),
        Commands::Gallery {
            image,
            with,
            mode,
            engine,
            output,
            font,
        } => gallery(image, with, mode.into(), &engine, output, font),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(args: &EngineArgs) -> Box<dyn OcrEngine> {
    match args.engine {
        Engine::Tesseract => {
            let mut bridge = TesseractBridge::default()
                .with_command(args.tesseract_cmd.clone())
                .with_lang(args.lang.clone());
            if let Some(psm) = args.psm {
                bridge = bridge.with_psm(psm);
            }
            Box::new(bridge)
        }
        Engine::Json => match &args.ocr_json {
            Some(path) => Box::new(JsonOcrSource::from_file(path.clone())),
            None => Box::new(JsonOcrSource::sidecar()),
        },
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Input is not a file: {}", path.display());
    }
    Ok(())
}

fn compare(
    image_a: PathBuf,
    image_b: PathBuf,
    granularity: Granularity,
    engine_args: &EngineArgs,
    output: PathBuf,
    font: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    require_file(&image_a)?;
    require_file(&image_b)?;

    let engine = build_engine(engine_args);
    let mut config = PipelineConfig::new(granularity, output);
    if let Some(font) = font {
        config = config.with_font(font);
    }

    if !quiet {
        println!("[*] Author A: {}", image_a.display());
        println!("[*] Author B: {}", image_b.display());
        println!("[*] Mode: {} ({} engine)", granularity.label(), engine.name());
    }

    let result = run_comparison(
        engine.as_ref(),
        &image_a,
        &image_b,
        &config,
        &CancellationToken::new(),
    )
    .with_context(|| {
        format!(
            "Failed to compare {} with {}",
            image_a.display(),
            image_b.display()
        )
    })?;

    if !quiet {
        println!(
            "[+] {} elements from A, {} from B",
            result.elements_a, result.elements_b
        );
        match &result.label_font {
            Some(font) => println!("[*] Labels drawn with: {}", font.display()),
            None => println!("[!] No label font found; middle column left blank (use --font)"),
        }
        println!("[✓] Collage saved to: {}", result.collage.display());
    }

    Ok(())
}

fn extract(
    image: PathBuf,
    granularity: Granularity,
    engine_args: &EngineArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    require_file(&image)?;

    let engine = build_engine(engine_args);
    let elements = extract_text_and_boxes(engine.as_ref(), &image, granularity)
        .with_context(|| format!("Failed to extract text from: {}", image.display()))?;

    let output_dir = output.unwrap_or_else(|| {
        image
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let exporter = JsonExporter::new(
        output_dir.clone(),
        format!("{stem}.{}s.json", granularity.label()),
        granularity,
    );
    let written = exporter
        .export(&elements)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    println!("[✓] {} elements written to: {}", elements.len(), written.display());
    Ok(())
}

fn gallery(
    image: PathBuf,
    with: Option<PathBuf>,
    granularity: Granularity,
    engine_args: &EngineArgs,
    output: PathBuf,
    font: Option<PathBuf>,
) -> Result<()> {
    require_file(&image)?;

    let engine = build_engine(engine_args);
    let mut config = PipelineConfig::new(granularity, output);
    if let Some(font) = font {
        config = config.with_font(font);
    }

    let tiles = author_tiles(engine.as_ref(), &image, "author 1", &config)?;
    let buckets: BucketMap<_> = match with {
        Some(other) => {
            require_file(&other)?;
            let other_tiles = author_tiles(engine.as_ref(), &other, "author 2", &config)?;
            merge_author_buckets(&tiles, &other_tiles)
        }
        None => tiles,
    };

    let written = create_collage(&buckets, &config).context("Failed to write gallery collage")?;
    println!("[✓] Gallery saved to: {}", written.display());
    Ok(())
}

fn author_tiles(
    engine: &dyn OcrEngine,
    image: &Path,
    author: &str,
    config: &PipelineConfig,
) -> Result<BucketMap<ElementTile>> {
    let elements = extract_text_and_boxes(engine, image, config.granularity)
        .with_context(|| format!("Failed to extract text from: {}", image.display()))?;
    Ok(generate_element_images(&elements, author, config)?)
}
