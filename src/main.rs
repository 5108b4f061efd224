use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use cuecard_core::config::{Config, KeyphraseBackend, ProviderKind};
use cuecard_core::{
    AnyKeyphraseExtractor, EmbeddingKeyphraseExtractor, FlashcardPipeline, FlashcardSet,
    FrequencyKeyphraseExtractor, LlmAnswerModel,
};
use cuecard_document::{AnyParser, DocumentParser, RawDocument};
use cuecard_llm::any::AnyProvider;
use cuecard_llm::ollama::OllamaProvider;
use cuecard_llm::{LlmProvider, Truncator, WhitespaceTruncator};

const NO_FLASHCARDS: &str = "No flashcards available.";

type AppPipeline =
    FlashcardPipeline<AnyKeyphraseExtractor<AnyProvider>, AnyProvider, LlmAnswerModel<AnyProvider>>;

#[derive(Parser)]
#[command(
    name = "cuecard",
    version,
    about = "Turn a study document into ranked question/answer flashcards",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Document to read (PDF, plain text or Markdown)
    file: Option<PathBuf>,

    /// Config file (default: $CUECARD_CONFIG or config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of flashcards to keep (overrides flashcards.top_k)
    #[arg(long)]
    top_k: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured model backend is reachable
    Check,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    if let Some(k) = cli.top_k {
        config.flashcards.top_k = k;
        config.validate()?;
    }

    match (cli.command, cli.file) {
        (Some(Commands::Check), _) => check(&config).await,
        (None, Some(file)) => {
            let set = run(&file, &config).await?;
            println!("{}", render(&set, cli.format)?);
            Ok(())
        }
        (None, None) => bail!("no input document given, see `cuecard --help`"),
    }
}

/// Logs go to stderr so flashcards on stdout stay machine readable.
fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("CUECARD_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

/// Rejects files whose extension no parser handles. Files without an
/// extension are sniffed by content instead.
fn ensure_supported(file: &Path, parser: &dyn DocumentParser) -> anyhow::Result<()> {
    let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
        return Ok(());
    };
    let ext = ext.to_ascii_lowercase();
    let supported = parser.supported_extensions();
    if !supported.contains(&ext.as_str()) {
        bail!(
            "unsupported file type .{ext} (supported: {})",
            supported.join(", ")
        );
    }
    Ok(())
}

async fn run(file: &Path, config: &Config) -> anyhow::Result<FlashcardSet> {
    ensure_supported(file, &AnyParser::default())?;
    let raw = RawDocument::read(file, config.document.max_file_size)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let pipeline = create_pipeline(config)?;
    pipeline
        .build_flashcards(raw)
        .await
        .with_context(|| format!("failed to build flashcards from {}", file.display()))
}

fn create_pipeline(config: &Config) -> anyhow::Result<AppPipeline> {
    let generator = create_provider(config, ModelRole::Questions)?;
    let answerer = create_provider(config, ModelRole::Answers)?;
    tracing::info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        answer_model = config.llm.answer_model(),
        keyphrase = %config.keyphrase.backend,
        "building flashcard pipeline"
    );

    let keyphrases = match config.keyphrase.backend {
        KeyphraseBackend::Frequency => AnyKeyphraseExtractor::Frequency(
            FrequencyKeyphraseExtractor::new(config.keyphrase.max_ngram),
        ),
        KeyphraseBackend::Embedding => {
            if !generator.supports_embeddings() {
                bail!("provider {} cannot produce embeddings", generator.name());
            }
            AnyKeyphraseExtractor::Embedding(EmbeddingKeyphraseExtractor::new(
                Arc::new(generator.clone()),
                config.keyphrase.max_ngram,
            ))
        }
    };

    Ok(FlashcardPipeline::builder(
        Arc::new(keyphrases),
        Arc::new(generator),
        Arc::new(LlmAnswerModel::new(Arc::new(answerer))),
    )
    .configure(config)
    .truncator(create_truncator(config)?)
    .build())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ModelRole {
    Questions,
    Answers,
}

fn create_provider(config: &Config, role: ModelRole) -> anyhow::Result<AnyProvider> {
    let model = match role {
        ModelRole::Questions => config.llm.model.as_str(),
        ModelRole::Answers => config.llm.answer_model(),
    };
    match config.llm.provider {
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(
            OllamaProvider::new(
                &config.llm.base_url,
                model.to_owned(),
                config.llm.embedding_model.clone(),
            )
            .with_timeout(Duration::from_secs(config.llm.timeout_secs)),
        )),
        #[cfg(feature = "mock")]
        ProviderKind::Mock => {
            let mut mock = cuecard_llm::mock::MockProvider::default();
            mock.supports_embeddings = true;
            mock.default_response = match role {
                ModelRole::Questions => "What is described here?".into(),
                ModelRole::Answers => r#"{"answer": "mock answer", "score": 0.5}"#.into(),
            };
            Ok(AnyProvider::Mock(mock))
        }
        #[cfg(not(feature = "mock"))]
        ProviderKind::Mock => {
            bail!("llm.provider = \"mock\" requires a build with the `mock` feature")
        }
    }
}

fn create_truncator(config: &Config) -> anyhow::Result<Arc<dyn Truncator>> {
    let Some(path) = config.generation.tokenizer_path.as_deref() else {
        return Ok(Arc::new(WhitespaceTruncator));
    };
    #[cfg(feature = "tokenizers")]
    {
        let truncator = cuecard_llm::HfTruncator::from_file(path)?;
        tracing::info!(path = %path.display(), "loaded generation tokenizer");
        Ok(Arc::new(truncator))
    }
    #[cfg(not(feature = "tokenizers"))]
    {
        bail!(
            "generation.tokenizer_path = {} requires a build with the `tokenizers` feature",
            path.display()
        )
    }
}

async fn check(config: &Config) -> anyhow::Result<()> {
    let provider = create_provider(config, ModelRole::Questions)?;
    provider
        .health_check()
        .await
        .with_context(|| format!("{} backend is not usable", provider.name()))?;
    println!(
        "{} backend at {} is reachable (model {}, answer model {})",
        provider.name(),
        config.llm.base_url,
        config.llm.model,
        config.llm.answer_model()
    );
    Ok(())
}

fn render(set: &FlashcardSet, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(set)?),
        OutputFormat::Text if set.is_empty() => Ok(NO_FLASHCARDS.to_owned()),
        OutputFormat::Text => {
            let mut out = String::new();
            for (idx, card) in set.iter().enumerate() {
                if idx > 0 {
                    out.push_str("\n\n");
                }
                writeln!(out, "{}. Q: {}", idx + 1, card.question)?;
                writeln!(out, "   A: {}", card.answer)?;
                write!(out, "   confidence: {:.2}", card.score)?;
            }
            Ok(out)
        }
    }
}
