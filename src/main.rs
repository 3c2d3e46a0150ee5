use clap::{ArgGroup, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use unibeautify_edits::{
    CancellationToken, ColumnShift, CommandFormatter, EditProvider, EditResponse, FormattingOptions,
    Notifier, Position, PrecomputedFormatter, Range, Settings, TextEdit, activate, apply_edits,
    generate_execution_id, read_document, structured_patch, verify_checksum,
};

/// Minimal editor edits from beautifier output
#[derive(Parser, Debug)]
#[command(name = "unibeautify-edits")]
#[command(version)]
#[command(about = "Turn beautifier output into minimal, position-based text edits", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format a file (or a range of it) and print the resulting edits
    Format(FormatArgs),
    /// Print the languages and document selector the provider registers
    Languages(LanguagesArgs),
}

#[derive(clap::Args, Debug)]
struct SettingsArgs {
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Project root; config search never goes above it
    #[arg(long)]
    project: Option<PathBuf>,

    /// Config file used when no config is found by searching
    #[arg(long)]
    default_config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["formatted", "formatter"])))]
struct FormatArgs {
    /// File to format
    #[arg(short, long)]
    file: PathBuf,

    /// Range to format, as `line:col-line:col` (zero-based)
    #[arg(short, long, value_parser = parse_range)]
    range: Option<Range>,

    /// Editor language id (detected from the extension when omitted)
    #[arg(long)]
    language_id: Option<String>,

    /// File holding the already-formatted text of the range
    #[arg(long)]
    formatted: Option<PathBuf>,

    /// Formatter program: reads the text on stdin, writes the result on stdout
    #[arg(long)]
    formatter: Option<String>,

    /// Arguments for the formatter program
    #[arg(last = true)]
    formatter_args: Vec<String>,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Shift every edit column by the range's start column
    #[arg(long)]
    legacy_column_shift: bool,

    /// Refuse to run unless the file has this BLAKE3 checksum
    #[arg(long)]
    expected_checksum: Option<String>,

    /// Tab size reported to the formatter
    #[arg(long, default_value_t = 4)]
    tab_size: u32,

    /// Report tab indentation to the formatter
    #[arg(long)]
    use_tabs: bool,

    /// Print the edited text instead of the edit list
    #[arg(long, conflicts_with = "diff")]
    apply: bool,

    /// Print a unified diff of the edits' effect
    #[arg(long, conflicts_with = "json")]
    diff: bool,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct LanguagesArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,
}

/// User-facing messages go straight to the terminal
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn show_error_message(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Parse `line:col-line:col`
fn parse_range(value: &str) -> Result<Range, String> {
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| format!("expected `line:col-line:col`, got `{}`", value))?;
    Ok(Range::new(parse_position(start)?, parse_position(end)?))
}

fn parse_position(value: &str) -> Result<Position, String> {
    let (line, character) = value
        .split_once(':')
        .ok_or_else(|| format!("expected `line:col`, got `{}`", value))?;
    let line = line.trim().parse().map_err(|e| format!("invalid line `{}`: {}", line, e))?;
    let character = character
        .trim()
        .parse()
        .map_err(|e| format!("invalid column `{}`: {}", character, e))?;
    Ok(Position::new(line, character))
}

fn load_settings(args: &SettingsArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(project) = &args.project {
        settings.project_path = Some(project.clone());
    }
    if let Some(default_config) = &args.default_config {
        settings.default_config = Some(default_config.clone());
    }
    Ok(settings)
}

/// Result of a successful formatting run
struct FormatOutcome {
    checksum: String,
    edits: Vec<TextEdit>,
    original: String,
    formatted: Option<String>,
}

async fn format_file(args: &FormatArgs) -> Result<FormatOutcome, Box<dyn std::error::Error>> {
    let document = read_document(&args.file, args.language_id.as_deref())?;
    if let Some(expected) = &args.expected_checksum {
        verify_checksum(&document.text, expected)?;
    }

    let mut settings = load_settings(&args.settings)?;
    if args.legacy_column_shift {
        settings.column_shift = ColumnShift::Uniform;
    }

    let provider = match (&args.formatted, &args.formatter) {
        (Some(path), _) => EditProvider::new(PrecomputedFormatter::new(fs::read_to_string(path)?), settings),
        (None, Some(program)) => EditProvider::new(
            CommandFormatter::new(program.as_str(), args.formatter_args.clone()),
            settings,
        ),
        (None, None) => return Err("either --formatted or --formatter is required".into()),
    }
    .with_notifier(StderrNotifier);

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let options = FormattingOptions {
        tab_size: args.tab_size,
        insert_spaces: !args.use_tabs,
    };
    let range = args.range.unwrap_or_else(|| document.full_range());
    let edits = provider
        .provide_range_formatting_edits(&document, range, &options, &token)
        .await?;

    let formatted = if args.apply || args.diff {
        Some(apply_edits(&document.text, &edits)?)
    } else {
        None
    };

    Ok(FormatOutcome {
        checksum: document.checksum(),
        edits,
        original: document.text,
        formatted,
    })
}

async fn run_format(args: FormatArgs) -> i32 {
    let execution_id = generate_execution_id();

    let (output, code) = match format_file(&args).await {
        Ok(outcome) => (render_outcome(&args, execution_id, outcome), 0),
        Err(e) => {
            let message = format!("Failed to format '{}': {}", args.file.display(), e);
            let output = if args.json {
                render_json(&EditResponse::failure(execution_id, message))
            } else {
                format!("Error: {}", message)
            };
            (output, 1)
        }
    };

    match write_output(&output, args.output.as_deref()) {
        Ok(()) => code,
        Err(e) => {
            eprintln!("Failed to write output: {}", e);
            1
        }
    }
}

fn render_outcome(args: &FormatArgs, execution_id: String, outcome: FormatOutcome) -> String {
    if args.json {
        let mut response = EditResponse::success(execution_id, outcome.checksum, &outcome.edits);
        response.formatted = outcome.formatted;
        return render_json(&response);
    }

    if args.diff {
        let name = args.file.display().to_string();
        let formatted = outcome.formatted.unwrap_or_default();
        return structured_patch(&name, &name, &outcome.original, &formatted, "original", "formatted")
            .to_string();
    }

    if let Some(formatted) = outcome.formatted {
        return formatted;
    }

    let mut lines = vec![
        format!("{} edit(s)", outcome.edits.len()),
        format!("Checksum: {}", outcome.checksum),
    ];
    lines.extend(outcome.edits.iter().map(|edit| edit.to_string()));
    lines.join("\n")
}

fn render_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| r#"{"success": false, "error": "Failed to serialize response"}"#.to_string())
}

async fn run_languages(args: LanguagesArgs) -> i32 {
    let settings = match load_settings(&args.settings) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return 1;
        }
    };

    let output = match activate(&settings, &StderrNotifier).await {
        Ok(Some(registration)) if args.json => render_json(&registration),
        Ok(Some(registration)) => {
            let mut lines = vec![format!("Priority: {}", registration.priority)];
            lines.extend(registration.languages.iter().map(|language| {
                format!("{}: {}", language.name(), language.editor_ids().join(", "))
            }));
            lines.join("\n")
        }
        Ok(None) => "unibeautify is disabled".to_string(),
        Err(e) => {
            eprintln!("Error resolving options: {}", e);
            return 1;
        }
    };

    match write_output(&output, None) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Failed to write output: {}", e);
            1
        }
    }
}

/// Write to file or stdout
fn write_output(output: &str, output_path: Option<&Path>) -> std::io::Result<()> {
    match output_path {
        Some(path) => fs::write(path, output),
        None => {
            println!("{}", output);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let code = match args.command {
        Command::Format(format_args) => run_format(format_args).await,
        Command::Languages(languages_args) => run_languages(languages_args).await,
    };

    std::process::exit(code);
}
