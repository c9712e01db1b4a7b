use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use d2s_core::core_api::{CoreError, CoreErrorCode, Engine, Session};
use d2s_core::d2s::DecodeOptions;
use d2s_core::d2s::skills::Ruleset;
use d2s_core::tables::{GameData, TableStore};
use d2s_render::{
    FieldSelection, JsonStyle, TextRenderOptions, TextStyle, render_json_full,
    render_json_selected, render_layout_json, render_layout_text, render_selected_pairs,
    render_text_with_options,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "d2s_sheet=warn,d2s_core=warn";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RulesetArg {
    /// 30 skills per class.
    Classic,
    /// 30 skills plus three extra ids per class.
    Extended,
}

impl From<RulesetArg> for Ruleset {
    fn from(arg: RulesetArg) -> Self {
        match arg {
            RulesetArg::Classic => Ruleset::Classic,
            RulesetArg::Extended => Ruleset::Extended,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.d2s")]
    path: PathBuf,
    /// JSON balance-table bundle. Without it only a basic decode runs.
    #[arg(long, value_name = "FILE", env = "D2S_DATA")]
    data: Option<PathBuf>,
    /// Secondary bundle whose names fill blanks in --data.
    #[arg(long, value_name = "FILE", env = "D2S_NAMES")]
    names: Option<PathBuf>,
    #[arg(long, value_enum, env = "D2S_RULESET", default_value_t = RulesetArg::Extended)]
    ruleset: RulesetArg,
    #[arg(long)]
    json: bool,
    /// Print the byte range of every decoded section.
    #[arg(long)]
    layout: bool,
    /// Show set bonuses and item codes on the sheet.
    #[arg(long, short)]
    verbose: bool,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    class: bool,
    #[arg(long)]
    level: bool,
    #[arg(long)]
    status: bool,
    #[arg(long = "last-played")]
    last_played: bool,
    #[arg(long)]
    attributes: bool,
    #[arg(long)]
    derived: bool,
    #[arg(long)]
    skills: bool,
    #[arg(long)]
    equipped: bool,
    #[arg(long)]
    inventory: bool,
    #[arg(long)]
    mercenary: bool,
    #[arg(long)]
    notices: bool,
}

impl Cli {
    fn field_selection(&self) -> FieldSelection {
        FieldSelection {
            name: self.name,
            class: self.class,
            level: self.level,
            status: self.status,
            last_played: self.last_played,
            attributes: self.attributes,
            derived: self.derived,
            skills: self.skills,
            equipped: self.equipped,
            inventory: self.inventory,
            mercenary: self.mercenary,
            notices: self.notices,
        }
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let fields = cli.field_selection();

    if cli.layout && fields.is_any_selected() {
        eprintln!("--layout cannot be combined with field flags");
        process::exit(2);
    }
    if cli.names.is_some() && cli.data.is_none() {
        eprintln!("--names requires --data <FILE>");
        process::exit(2);
    }

    let tables = cli.data.as_deref().map(|path| {
        load_tables(path, cli.names.as_deref()).unwrap_or_else(|e| {
            eprintln!("Error loading tables from {}", path.display());
            eprintln!("  {e}");
            process::exit(1);
        })
    });

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let mut engine = Engine::new().with_options(DecodeOptions {
        ruleset: cli.ruleset.into(),
    });
    if let Some(data) = tables {
        engine = engine.with_tables(Arc::new(TableStore::new(data)));
    }

    let session = engine.open_bytes(bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing save file: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });
    debug!(
        method = session.parse_method().as_str(),
        notices = session.character().notices.len(),
        "decoded save"
    );

    if cli.layout {
        print_layout(&session, cli.json);
        return;
    }

    if fields.is_any_selected() {
        if cli.json {
            print_json(&render_json_selected(
                &session,
                &fields,
                JsonStyle::CanonicalV1,
            ));
        } else {
            for (key, value) in render_selected_pairs(&session, &fields) {
                println!("{key}={value}");
            }
        }
        return;
    }

    if cli.json {
        print_json(&render_json_full(&session, JsonStyle::CanonicalV1));
    } else {
        let options = TextRenderOptions {
            verbose: cli.verbose,
        };
        print!(
            "{}",
            render_text_with_options(&session, TextStyle::CharacterSheet, options)
        );
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_tables(path: &Path, names: Option<&Path>) -> Result<GameData, CoreError> {
    let mut data = read_bundle(path)?.with_builtin_overrides();
    if let Some(names_path) = names {
        let fallback = read_bundle(names_path)?;
        data.merge_missing_names(&fallback);
        info!(path = %names_path.display(), "merged secondary names");
    }
    info!(
        path = %path.display(),
        item_types = data.item_types.len(),
        stats = data.stats.len(),
        skills = data.skills.len(),
        "loaded balance tables"
    );
    Ok(data)
}

fn read_bundle(path: &Path) -> Result<GameData, CoreError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CoreError::new(CoreErrorCode::Io, format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Tables,
            format!("{}: {e}", path.display()),
        )
    })
}

fn print_layout(session: &Session, json: bool) {
    let Some(layout) = session.layout() else {
        eprintln!("No layout recorded: the save was only partially decoded");
        for notice in &session.character().notices {
            eprintln!("  {notice}");
        }
        process::exit(1);
    };
    if json {
        print_json(&render_layout_json(layout));
    } else {
        print!("{}", render_layout_text(layout));
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            process::exit(1);
        }
    }
}
