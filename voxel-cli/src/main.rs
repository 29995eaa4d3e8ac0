//! Voxel CLI
//!
//! A headless front end for the editor core: inspect a screen, apply edits,
//! generate markup from an instruction and manage stored screen history.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use voxel_common::notice::{Notice, NoticeLevel};
use voxel_dom::NodeId;
use voxel_editor::document::read_source;
use voxel_editor::generation::{GenerationConfig, ScreenMetadata};
use voxel_editor::{
    ApplyMode, Document, EditorConfig, EditorEvent, EditorSession, GenerationBridge,
    GenerationRequest, HttpProvider, JsonFileStore, LiveTree, ScreenStore, SharedDocument,
};
use voxel_html::serializer::escape_text;
use voxel_html::{HTMLParser, HTMLTokenizer, print_tree};

/// Voxel - inspect and edit imported HTML screens from the terminal
#[derive(Parser, Debug)]
#[command(name = "voxel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM tree and parse issues
    voxel inspect ./landing.html

    # Show the path and properties of the second <p>
    voxel inspect ./landing.html --select p:1

    # Restyle an element and write the clean result
    voxel edit ./landing.html --select h1 --style color=#ff0000 -o out.html

    # Append generated markup (uses VOXEL_LLM_* when set)
    voxel generate ./landing.html "add a signup form"

    # Import a screen and list its history
    voxel screens --store ./screens import "Landing" ./landing.html
    voxel screens --store ./screens history landing
"#)]
struct Cli {
    /// JSON editor config; missing keys keep their defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the DOM tree, screen metadata and parse issues
    Inspect {
        /// Path to an HTML file or URL
        #[arg(value_name = "FILE|URL")]
        source: String,

        /// Element to describe, as `tag`, `tag:index` or `#id`
        #[arg(long, value_name = "TAG[:N]|#ID")]
        select: Option<String>,
    },

    /// Remove editor artifacts and print canonical markup
    Clean {
        /// Path to an HTML file or URL
        #[arg(value_name = "FILE|URL")]
        source: String,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Apply edits to one element and print the committed document
    Edit {
        /// Path to an HTML file or URL
        #[arg(value_name = "FILE|URL")]
        source: String,

        /// Element to edit, as `tag`, `tag:index` or `#id`
        #[arg(long, value_name = "TAG[:N]|#ID")]
        select: String,

        /// Inline style declaration, repeatable
        #[arg(long, value_name = "PROP=VALUE")]
        style: Vec<String>,

        /// Attribute to set, repeatable
        #[arg(long, value_name = "NAME=VALUE")]
        attr: Vec<String>,

        /// Replace the element's text
        #[arg(long)]
        text: Option<String>,

        /// Point an <img> at a new source
        #[arg(long, value_name = "URL")]
        image: Option<String>,

        /// Duplicate the element after the other edits
        #[arg(long, conflicts_with = "delete")]
        duplicate: bool,

        /// Delete the element after the other edits
        #[arg(long)]
        delete: bool,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate markup from an instruction and apply it
    Generate {
        /// Path to an HTML file or URL
        #[arg(value_name = "FILE|URL")]
        source: String,

        /// What to build
        instruction: String,

        /// Product context sent alongside the instruction
        #[arg(long)]
        context: Option<String>,

        /// Append a fragment or replace the whole document
        #[arg(long, value_enum, default_value_t = ApplyArg::Append)]
        mode: ApplyArg,

        /// Print the generated markup without applying it
        #[arg(long)]
        preview: bool,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Manage stored screens and their version history
    Screens {
        /// Directory holding one JSON record per screen
        #[arg(long, value_name = "DIR", default_value = "screens")]
        store: PathBuf,

        #[command(subcommand)]
        action: ScreenAction,
    },
}

#[derive(Subcommand, Debug)]
enum ScreenAction {
    /// List stored screens
    List,
    /// Import markup as a new screen
    Import {
        /// Display name
        name: String,
        /// Path to an HTML file or URL
        #[arg(value_name = "FILE|URL")]
        source: String,
    },
    /// Print the latest version of a screen
    Show {
        /// Screen id
        id: String,
    },
    /// List every version of a screen
    History {
        /// Screen id
        id: String,
    },
    /// Remove a screen and its history
    Delete {
        /// Screen id
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ApplyArg {
    Append,
    Replace,
}

impl From<ApplyArg> for ApplyMode {
    fn from(arg: ApplyArg) -> Self {
        match arg {
            ApplyArg::Append => Self::Append,
            ApplyArg::Replace => Self::Replace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    config.apply_env_overrides()?;

    match cli.command {
        Command::Inspect { source, select } => inspect(&source, select.as_deref(), &config),
        Command::Clean { source, output } => {
            let raw = read_source(&source)?;
            let live = LiveTree::render(&Document::load(raw), &config);
            write_output(output.as_deref(), &live.serialize())
        }
        Command::Edit {
            source,
            select,
            style,
            attr,
            text,
            image,
            duplicate,
            delete,
            output,
        } => {
            let edits = Edits {
                style,
                attr,
                text,
                image,
                duplicate,
                delete,
            };
            let html = edit(&source, &select, &edits, config)?;
            write_output(output.as_deref(), &html)
        }
        Command::Generate {
            source,
            instruction,
            context,
            mode,
            preview,
            output,
        } => {
            let html = generate(&source, &instruction, context, mode.into(), preview, config)?;
            write_output(output.as_deref(), &html)
        }
        Command::Screens { store, action } => screens(&store, action),
    }
}

/// Send logs to stderr so stdout stays clean for markup.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn write_output(path: Option<&Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => eprintln!("{} {notice}", "info:".cyan()),
            NoticeLevel::Warning => eprintln!("{} {notice}", "warning:".yellow()),
            NoticeLevel::Error => eprintln!("{} {notice}", "error:".red()),
        }
    }
}

/// Resolve `tag` or `tag:index` to the matching element in document order.
fn find_element(live: &LiveTree, selector: &str) -> Result<NodeId> {
    if let Some(id) = selector.strip_prefix('#') {
        return live
            .tree()
            .element_by_id(id)
            .with_context(|| format!("no element has id {id:?}"));
    }
    let (tag, index) = match selector.split_once(':') {
        Some((tag, index)) => (
            tag,
            index
                .parse::<usize>()
                .with_context(|| format!("invalid index in selector {selector:?}"))?,
        ),
        None => (selector, 0),
    };
    let tag = tag.to_ascii_lowercase();
    let tree = live.tree();
    tree.iter_all()
        .filter(|&id| tree.is_element_named(id, &tag))
        .nth(index)
        .with_context(|| format!("no element matches {selector:?}"))
}

fn inspect(source: &str, select: Option<&str>, config: &EditorConfig) -> Result<()> {
    let raw = read_source(source)?;

    let mut tokenizer = HTMLTokenizer::new(raw.clone());
    tokenizer.run();
    let (tree, issues) = HTMLParser::new(tokenizer.into_tokens()).run_with_issues();

    println!("{}", "=== DOM Tree ===".bold());
    print_tree(&tree, tree.root(), 0);

    let live = LiveTree::render(&Document::load(raw.clone()), config);
    let metadata = ScreenMetadata::from_live_tree(&live, None);
    println!("\n{}", "=== Screen ===".bold());
    if let Some(title) = &metadata.title {
        println!("title: {title}");
    }
    println!("{} elements", metadata.element_count);
    for heading in &metadata.headings {
        println!("  {heading}");
    }

    if !issues.is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold());
        for issue in &issues {
            let kind = if issue.is_error {
                "error".red().to_string()
            } else {
                "approximated".yellow().to_string()
            };
            println!("  - [{kind}] {} (token {})", issue.message, issue.token_index);
        }
    }

    if let Some(selector) = select {
        let sink = SharedDocument::new();
        let mut session = EditorSession::new(Document::load(raw), config.clone(), Box::new(sink));
        let id = find_element(session.live_tree(), selector)?;
        session.dispatch(EditorEvent::Click(id));
        if session.selected().is_none() {
            anyhow::bail!("{selector:?} cannot be selected");
        }

        println!("\n{}", "=== Selection ===".bold());
        println!("{}", session.selection_path().cyan());
        if let Some(properties) = session.properties() {
            println!("{}", serde_json::to_string_pretty(properties)?);
        }
    }
    Ok(())
}

struct Edits {
    style: Vec<String>,
    attr: Vec<String>,
    text: Option<String>,
    image: Option<String>,
    duplicate: bool,
    delete: bool,
}

fn split_pair<'a>(pair: &'a str, what: &str) -> Result<(&'a str, &'a str)> {
    pair.split_once('=')
        .with_context(|| format!("{what} must look like NAME=VALUE, got {pair:?}"))
}

fn edit(source: &str, selector: &str, edits: &Edits, config: EditorConfig) -> Result<String> {
    let sink = SharedDocument::new();
    let mut session = EditorSession::new(Document::load(read_source(source)?), config, Box::new(sink.clone()));

    let id = find_element(session.live_tree(), selector)?;
    session.dispatch(EditorEvent::Click(id));
    if session.selected().is_none() {
        anyhow::bail!("{selector:?} cannot be selected");
    }

    for declaration in &edits.style {
        let (property, value) = split_pair(declaration, "--style")?;
        if !session.set_style(property.trim(), value.trim()) {
            anyhow::bail!("could not set style {declaration:?}");
        }
    }
    for attribute in &edits.attr {
        let (name, value) = split_pair(attribute, "--attr")?;
        if !session.set_attribute(name, value) {
            anyhow::bail!("could not set attribute {name:?}");
        }
    }
    if let Some(text) = &edits.text {
        if !session.begin_text_edit() {
            anyhow::bail!("{selector:?} does not hold text");
        }
        let mut markup = String::new();
        escape_text(text, &mut markup);
        let _ = session.input(&markup);
        session.blur();
    }
    if let Some(url) = &edits.image
        && !session.replace_image(url)
    {
        anyhow::bail!("{selector:?} is not an image");
    }
    if edits.duplicate && session.duplicate_selected().is_none() {
        anyhow::bail!("could not duplicate {selector:?}");
    }
    if edits.delete && !session.delete_selected() {
        anyhow::bail!("could not delete {selector:?}");
    }

    session.close();
    print_notices(&session.take_notices());
    tracing::info!(commits = sink.commit_count(), "edits applied");
    Ok(session.document().raw.clone())
}

fn generate(
    source: &str,
    instruction: &str,
    context: Option<String>,
    mode: ApplyMode,
    preview: bool,
    config: EditorConfig,
) -> Result<String> {
    let provider = HttpProvider::new(GenerationConfig::from_env())?;
    let sink = SharedDocument::new();
    let mut session = EditorSession::new(Document::load(read_source(source)?), config, Box::new(sink));

    let metadata = ScreenMetadata::from_live_tree(session.live_tree(), None);
    let mut request = GenerationRequest::new(instruction, session.document().raw.clone()).with_metadata(metadata);
    if let Some(context) = context {
        request = request.with_context(context);
    }

    let mut bridge = GenerationBridge::new();
    let Some(result) = bridge.run(&provider, &request)? else {
        anyhow::bail!("generation produced no result");
    };
    eprintln!("{} {}", "source:".cyan(), result.source);
    if let Some(notice) = &result.notice {
        print_notices(std::slice::from_ref(notice));
    }
    if preview {
        return Ok(result.html.clone());
    }

    if !bridge.apply(&mut session, mode) {
        anyhow::bail!("generated markup could not be applied");
    }
    session.close();
    Ok(session.document().raw.clone())
}

fn screens(root: &Path, action: ScreenAction) -> Result<()> {
    let mut store = JsonFileStore::open(root)
        .with_context(|| format!("failed to open store {}", root.display()))?;

    match action {
        ScreenAction::List => {
            let screens = store.list_screens()?;
            if screens.is_empty() {
                println!("No screens in {}", root.display());
            }
            for screen in screens {
                println!(
                    "{}  {}  ({} versions)",
                    screen.id.bold(),
                    screen.name,
                    screen.version_count
                );
            }
        }
        ScreenAction::Import { name, source } => {
            let raw = read_source(&source)?;
            let id = store.create_screen(&name, &raw)?;
            println!("{} {}", "Imported".green(), id.bold());
        }
        ScreenAction::Show { id } => println!("{}", store.load_screen(&id)?.html),
        ScreenAction::History { id } => {
            for version in store.list_versions(&id)? {
                let label = version
                    .description
                    .as_deref()
                    .or(version.prompt.as_deref())
                    .unwrap_or("");
                println!(
                    "v{}  {}  {} bytes  {label}",
                    version.number.bold(),
                    version.created_at_ms,
                    version.html.len()
                );
            }
        }
        ScreenAction::Delete { id } => {
            store.delete_screen(&id)?;
            println!("{} {id}", "Deleted".red());
        }
    }
    Ok(())
}
