//! dynstyle - render style files to deduplicated CSS

use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;

use dynstyle::{
    Config, ConfigFile, MemoryDocument, MemoryElement, StyleMap, StylePlugin, StyleSpec, flatten,
};

#[derive(Parser)]
#[command(name = "dynstyle")]
#[command(version, about = "Render nested style files to CSS", long_about = None)]
#[command(after_help = "EXAMPLES:
    dynstyle button.json                Print the CSS for one component
    dynstyle a.json b.json              Mount both; identical styles share one rule set
    dynstyle --scoped card.json         Bind rules to a generated class
    dynstyle --flatten card.json        Show the flattened selector map")]
struct Cli {
    /// Style files (JSON objects), one per component
    #[arg(value_name = "FILES", required = true)]
    files: Vec<String>,

    /// Prefix for generated scoping classes
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Scope styles to their component unless a file says otherwise
    #[arg(long)]
    scoped: bool,

    /// JSON config file with `prefix` and `scoped` defaults
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<String>,

    /// Print each file's flattened selector map instead of CSS
    #[arg(long)]
    flatten: bool,

    /// Log mounting details (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = if cli.flatten {
        show_flattened(&cli.files)
    } else {
        render(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => log::LevelFilter::Off,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_style(path: &str) -> dynstyle::Result<StyleMap> {
    let text = std::fs::read_to_string(path)?;
    StyleMap::from_json(&text)
}

fn build_config(cli: &Cli) -> dynstyle::Result<Config> {
    let mut config = Config::default();
    if let Some(ref path) = cli.config {
        let file = ConfigFile::from_json(&std::fs::read_to_string(path)?)?;
        config = config.apply(&file);
    }
    if let Some(ref prefix) = cli.prefix {
        config = config.with_prefix(prefix.clone());
    }
    if cli.scoped {
        config = config.with_scoped(true);
    }
    Ok(config)
}

fn render(cli: &Cli) -> Result<(), String> {
    let config = build_config(cli).map_err(|e| e.to_string())?;
    let document = MemoryDocument::new();
    let plugin = StylePlugin::install(config, document.clone());

    let mut mounted = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let style = load_style(path).map_err(|e| format!("{path}: {e}"))?;
        let styles = plugin
            .mount(Rc::new(MemoryElement::new()), Some(StyleSpec::from(style)))
            .map_err(|e| format!("{path}: {e}"))?;
        log::info!("{path}: mounted with class {}", styles.class_name());
        mounted.push(styles);
    }

    let stylesheet = document.stylesheet();
    if !stylesheet.is_empty() {
        println!("{stylesheet}");
    }
    if !cli.quiet && mounted.len() > 1 {
        eprintln!(
            "{} components, {} style nodes",
            mounted.len(),
            document.attached_count()
        );
    }

    plugin.uninstall().map_err(|e| e.to_string())
}

fn show_flattened(files: &[String]) -> Result<(), String> {
    for path in files {
        let style = load_style(path).map_err(|e| format!("{path}: {e}"))?;
        let flat = flatten(&style);
        let json = serde_json::to_string_pretty(&flat).map_err(|e| e.to_string())?;
        println!("{json}");
    }
    Ok(())
}
