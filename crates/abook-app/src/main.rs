// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ABook — layered handwriting notebook
//
// Entry point. Initialises logging and backend services, then either opens
// the notebook window or runs one command against the notebook store. Both go
// through the same `App` state machine and hit regions.

mod layout;
mod services;
mod state;
#[cfg(feature = "gui")]
mod window;

use std::path::PathBuf;
use std::process::ExitCode;

use abook_canvas::{DisplayGeometry, Point};
use abook_core::error::{AbookError, Result};
use abook_core::human_errors::humanize_error;
use abook_core::{Folder, NotebookId, TemplateKind, Tool};
use clap::{Parser, Subcommand};

use layout::NotepadLayout;
use services::app_services::AppServices;
use services::data_dir;
use state::{App, Command};

#[derive(Debug, Parser)]
#[command(name = "abook", version, about = "Layered handwriting notebooks")]
struct Cli {
    /// Data directory (default: $XDG_DATA_HOME/abook)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Open the notebook window, optionally straight into NAME
    #[cfg(feature = "gui")]
    Window { name: Option<String> },
    /// Create an empty notebook
    New {
        name: String,
        /// notes, books or tests
        #[arg(long, default_value = "notes")]
        folder: String,
        /// Template for the first layer, e.g. "Graph" or "Single Line"
        #[arg(long)]
        template: Option<String>,
    },
    /// List notebooks, most recently updated first
    List {
        #[arg(long)]
        folder: Option<String>,
    },
    /// Find notebooks whose name contains QUERY
    Search { query: String },
    /// Notebook counts per folder
    Stats,
    Delete { name: String },
    /// Write the visible layers to a PDF
    Export {
        name: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Save the landscape display frame as PNG
    Render {
        name: String,
        #[arg(long, default_value_t = 0)]
        layer: usize,
        /// Wheel notches to scroll down first
        #[arg(long, default_value_t = 0)]
        down: u32,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Recognise the handwriting on a layer
    Convert {
        name: String,
        #[arg(long, default_value_t = 0)]
        layer: usize,
    },
    /// Look a word up in the dictionary
    Define { word: String },
    /// Give layer LAYER of a notebook a new name
    RenameLayer {
        name: String,
        layer: usize,
        new_name: String,
    },
    /// Draw one stroke through canvas points "x,y" on the first page and save
    Draw {
        name: String,
        #[arg(long, default_value_t = 0)]
        layer: usize,
        #[arg(long, default_value = "pen")]
        tool: String,
        #[arg(long)]
        size: Option<u32>,
        #[arg(required = true)]
        points: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("ABook starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let human = humanize_error(&e);
            tracing::error!(error = %e, "command failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = data_dir::data_dir(cli.data_dir.as_deref());
    let mut svc = match AppServices::init(dir) {
        Ok(s) => s,
        Err(e) if e.is_storage_error() => {
            tracing::error!(error = %e, "persistent storage failed; using in-memory fallback");
            AppServices::fallback(Default::default())?
        }
        Err(e) => return Err(e),
    };

    match cli.command {
        #[cfg(feature = "gui")]
        CliCommand::Window { name } => {
            let open = name.map(|n| resolve(&svc, &n)).transpose()?;
            return window::run(svc, open);
        }
        CliCommand::New {
            name,
            folder,
            template,
        } => {
            let folder = parse_folder(&folder)?;
            let mut notebook = svc.new_notebook(&name, folder);
            if let Some(template) = template {
                let kind = TemplateKind::from_name(&template);
                if let Some(layer) = notebook.layer_mut(0) {
                    layer.apply_template(kind);
                }
                notebook.active_template = kind.name().to_owned();
            }
            let id = svc.save_notebook(&mut notebook)?;
            println!("created notebook {id} \"{name}\" in {}", folder.as_str());
        }
        CliCommand::List { folder } => {
            let folder = folder.as_deref().map(parse_folder).transpose()?;
            for nb in svc.list_notebooks()? {
                if folder.is_some_and(|f| f != nb.folder) {
                    continue;
                }
                print_summary(&nb);
            }
        }
        CliCommand::Search { query } => {
            for nb in svc.search_notebooks(&query)? {
                print_summary(&nb);
            }
        }
        CliCommand::Stats => {
            let stats = svc.stats()?;
            println!("total: {}", stats.total);
            for (folder, count) in &stats.by_folder {
                println!("{:>8}: {count}", folder.as_str());
            }
        }
        CliCommand::Delete { name } => {
            let id = resolve(&svc, &name)?;
            let mut app = App::new();
            app.dispatch(&mut svc, Command::DeleteNotebook(id))?;
            println!("{}", app.status().unwrap_or("deleted"));
        }
        CliCommand::Export { name, output } => {
            let id = resolve(&svc, &name)?;
            let notebook = svc
                .load_notebook(id)?
                .ok_or_else(|| missing(&name))?;
            let path = svc.export_pdf(&notebook, output.as_deref())?;
            println!("{}", path.display());
        }
        CliCommand::Render {
            name,
            layer,
            down,
            output,
        } => {
            let mut app = open(&mut svc, &name, layer)?;
            for _ in 0..down {
                app.dispatch(&mut svc, Command::Scroll(-1.0))?;
            }
            let editor = app
                .editor()
                .ok_or_else(|| AbookError::InvalidArgument("no notebook is open".into()))?;
            editor
                .render_frame()
                .save(&output)
                .map_err(|e| AbookError::ImageError(format!("writing {}: {e}", output.display())))?;
            println!("{}", output.display());
        }
        CliCommand::Convert { name, layer } => {
            let mut app = open(&mut svc, &name, layer)?;
            app.dispatch(&mut svc, Command::ConvertToText)?;
            let Some(conversion) = app.conversion() else {
                return Ok(());
            };
            println!("{}", conversion.text);
            for fix in &conversion.corrections {
                println!("  corrected: {} -> {}", fix.original, fix.replacement);
            }
            if let Some(summary) = &conversion.summary {
                println!("\nSummary: {summary}");
            }
            if conversion.found_text {
                for issue in svc.analyze(&conversion.text).grammar_issues {
                    println!("  grammar: {} ({})", issue.message, issue.suggestions.join(", "));
                }
            }
            if !conversion.words.is_empty() {
                println!("\nLook up: {}", conversion.words.join(" "));
            }
        }
        CliCommand::Define { word } => {
            let lookup = svc.define(&word);
            if !lookup.found {
                println!("{}: {}", lookup.word, lookup.error.as_deref().unwrap_or("not found"));
                return Ok(());
            }
            match &lookup.phonetic {
                Some(p) => println!("{} {p}", lookup.word),
                None => println!("{}", lookup.word),
            }
            for (i, def) in lookup.definitions.iter().enumerate() {
                println!("{}. ({}) {}", i + 1, def.part_of_speech, def.definition);
                if let Some(example) = &def.example {
                    println!("   \"{example}\"");
                }
            }
            if !lookup.synonyms.is_empty() {
                println!("synonyms: {}", lookup.synonyms.join(", "));
            }
            if !lookup.antonyms.is_empty() {
                println!("antonyms: {}", lookup.antonyms.join(", "));
            }
        }
        CliCommand::RenameLayer {
            name,
            layer,
            new_name,
        } => {
            let mut app = open(&mut svc, &name, layer)?;
            app.dispatch(&mut svc, Command::RenameLayer(layer, new_name.clone()))?;
            app.dispatch(&mut svc, Command::Save)?;
            println!("layer {} of \"{name}\" is now \"{new_name}\"", layer + 1);
        }
        CliCommand::Draw {
            name,
            layer,
            tool,
            size,
            points,
        } => {
            let tool = Tool::parse(&tool)
                .ok_or_else(|| AbookError::InvalidArgument(format!("unknown tool {tool:?}")))?;
            let points = points.iter().map(|p| parse_point(p)).collect::<Result<Vec<_>>>()?;
            let mut app = open(&mut svc, &name, layer)?;
            app.dispatch(&mut svc, Command::SelectTool(tool))?;
            if let Some(size) = size {
                app.dispatch(&mut svc, Command::SetToolSize(size))?;
            }
            draw_stroke(&mut app, &mut svc, &points)?;
            app.dispatch(&mut svc, Command::Save)?;
            println!("drew {} points with the {}", points.len(), tool.label().to_lowercase());
        }
    }
    Ok(())
}

/// Feed a canvas-space stroke through the hit regions, as touches would.
fn draw_stroke(app: &mut App, svc: &mut AppServices, points: &[Point]) -> Result<()> {
    let geometry = DisplayGeometry::default();
    let to_window = |p: Point| {
        geometry.to_landscape(Point::new(
            p.x + geometry.toolbar_width as i32,
            p.y + geometry.status_bar_height as i32,
        ))
    };
    let Some((&first, _)) = points.split_first() else {
        return Ok(());
    };

    let layer_count = app.editor().map_or(0, |e| e.notebook().layer_count());
    let layout = NotepadLayout::for_state(app.state(), geometry, layer_count);
    match layout.command_at(to_window(first)) {
        Some(begin @ Command::BeginStroke(_)) => app.dispatch(svc, begin)?,
        _ => {
            return Err(AbookError::InvalidArgument(format!(
                "({}, {}) is not on the visible canvas",
                first.x, first.y
            )));
        }
    }
    for &p in points {
        app.dispatch(svc, Command::ContinueStroke(to_window(p)))?;
    }
    app.dispatch(svc, Command::EndStroke)
}

fn open(svc: &mut AppServices, name: &str, layer: usize) -> Result<App> {
    let id = resolve(svc, name)?;
    let mut app = App::new();
    app.dispatch(svc, Command::OpenNotebook(id))?;
    app.dispatch(svc, Command::SelectLayer(layer))?;
    Ok(app)
}

fn resolve(svc: &AppServices, name: &str) -> Result<NotebookId> {
    svc.find_notebook(name)?.ok_or_else(|| missing(name))
}

fn missing(name: &str) -> AbookError {
    AbookError::InvalidArgument(format!("no notebook named {name:?}"))
}

fn parse_folder(name: &str) -> Result<Folder> {
    Folder::parse(name).ok_or_else(|| {
        AbookError::InvalidArgument(format!("unknown folder {name:?} (use notes, books or tests)"))
    })
}

fn parse_point(text: &str) -> Result<Point> {
    let bad = || AbookError::InvalidArgument(format!("expected x,y but got {text:?}"));
    let (x, y) = text.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok(Point::new(x, y))
}

fn print_summary(nb: &abook_core::NotebookSummary) {
    println!(
        "{:>4}  {:<6} {}  {}",
        nb.id.0,
        nb.folder.as_str(),
        nb.updated_at.format("%Y-%m-%d %H:%M"),
        nb.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_draw() {
        let cli = Cli::try_parse_from([
            "abook", "--data-dir", "/tmp/x", "draw", "Maths", "--tool", "eraser", "10,20", "30,40",
        ])
        .expect("parse");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            CliCommand::Draw { name, tool, points, layer, .. } => {
                assert_eq!(name, "Maths");
                assert_eq!(tool, "eraser");
                assert_eq!(layer, 0);
                assert_eq!(points, ["10,20", "30,40"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(feature = "gui")]
    #[test]
    fn cli_parses_window() {
        let cli = Cli::try_parse_from(["abook", "window", "Maths"]).expect("parse");
        assert!(matches!(cli.command, CliCommand::Window { name: Some(n) } if n == "Maths"));
        let cli = Cli::try_parse_from(["abook", "window"]).expect("parse");
        assert!(matches!(cli.command, CliCommand::Window { name: None }));
    }

    #[test]
    fn points_parse() {
        assert_eq!(parse_point(" 5, 7").expect("point"), Point::new(5, 7));
        assert!(parse_point("5;7").is_err());
        assert!(parse_point("a,7").is_err());
    }

    #[test]
    fn draw_stroke_hits_the_canvas() {
        let config = abook_core::AppConfig {
            spell_word_list: None,
            ..Default::default()
        };
        let mut svc = AppServices::fallback(config).expect("services");
        let mut app = App::new();
        app.dispatch(
            &mut svc,
            Command::CreateNotebook {
                name: "Sketch".into(),
                folder: Folder::Notes,
            },
        )
        .expect("create");

        draw_stroke(&mut app, &mut svc, &[Point::new(50, 50), Point::new(150, 50)]).expect("draw");
        let layer = app.editor().expect("editor").active_layer();
        assert_eq!(layer.pixels.get_pixel(100, 50).0, [20, 20, 20, 255]);

        let off_page = draw_stroke(&mut app, &mut svc, &[Point::new(50, 2000)]);
        assert!(off_page.is_err());
    }
}
