use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slide_layout_common::{create_notebook, load_notebook, save_notebook, LayoutConfig};
use slide_layout_core::catalog::DOCUMENTATION_URL;
use slide_layout_core::slideshow::{set_cell_slide, slide_role_of};
use slide_layout_core::{
    apply_template, Catalog, Menu, MenuItem, NotebookHost, NotebookSession,
};
use slide_layout_protocol::Notebook;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slide-layout")]
#[command(version)]
#[command(about = "Insert slide layouts into Jupyter notebooks and tag cells for slideshows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List layout commands as they appear in the Slides menu
    List,
    /// Insert a layout below a cell
    Insert {
        /// Notebook to edit
        notebook: PathBuf,
        /// Layout command id (see `list`)
        #[arg(short, long)]
        template: String,
        /// Insert below this cell; defaults to the end of the notebook
        #[arg(long, value_name = "INDEX")]
        after: Option<usize>,
        /// Write the result here instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Set or clear the slide role of one cell
    Tag {
        /// Notebook to edit
        notebook: PathBuf,
        /// Zero-based cell index
        #[arg(long, value_name = "INDEX")]
        cell: usize,
        /// slide | subslide | fragment | skip | notes (anything else clears)
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        role: Option<String>,
        /// Remove the slide role
        #[arg(long)]
        clear: bool,
        /// Write the result here instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print every cell with its slide role
    Show {
        notebook: PathBuf,
    },
    /// Create an empty notebook
    New {
        notebook: PathBuf,
    },
    /// Open the documentation link in a browser
    Docs {
        /// Print the URL instead of opening it
        #[arg(long)]
        print: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let cwd = std::env::current_dir()?;
    let config = LayoutConfig::load(cli.config.as_deref(), &cwd)
        .await
        .context("failed to load configuration")?;

    match cli.command {
        Commands::List => {
            let catalog = build_catalog(&config)?;
            print!("{}", render_menu(&catalog));
        }
        Commands::Insert {
            notebook,
            template,
            after,
            output,
        } => {
            let catalog = build_catalog(&config)?;
            let output = output.as_deref();
            insert_layout(&config, &catalog, &notebook, &template, after, output).await?;
        }
        Commands::Tag {
            notebook,
            cell,
            role,
            clear,
            output,
        } => {
            let role = if clear { None } else { role };
            tag_cell(&config, &notebook, cell, role.as_deref(), output.as_deref()).await?;
        }
        Commands::Show { notebook } => {
            let notebook = load_notebook(&notebook).await?;
            print!("{}", render_cells(&notebook));
        }
        Commands::New { notebook } => {
            create_notebook(&notebook, config.indent).await?;
            println!("Created {}", notebook.display());
        }
        Commands::Docs { print } => {
            let catalog = build_catalog(&config)?;
            let url = catalog.documentation_url().unwrap_or(DOCUMENTATION_URL);
            if print {
                println!("{url}");
            } else if let Err(e) = webbrowser::open(url) {
                tracing::warn!("Failed to open browser: {e}");
                println!("{url}");
            }
        }
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so `list` and `show` output stays pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_catalog(config: &LayoutConfig) -> Result<Catalog> {
    let url = config.documentation_url.as_deref().unwrap_or(DOCUMENTATION_URL);
    Catalog::builtin(url)
        .with_user_templates(config.templates.clone())
        .context("invalid templates in configuration")
}

async fn insert_layout(
    config: &LayoutConfig,
    catalog: &Catalog,
    path: &Path,
    template_id: &str,
    after: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let template = catalog.layout(template_id)?;
    let notebook = load_notebook(path).await?;

    let mut session = NotebookSession::new(notebook).with_cell_ids(config.assign_cell_ids);
    if let Some(index) = after {
        session.select(index)?;
    }
    let inserted = apply_template(&mut session, template)?;

    let target = output.unwrap_or(path);
    save_notebook(target, session.notebook(), config.indent).await?;

    let first = inserted.first().copied().unwrap_or_default();
    println!(
        "Inserted '{}' ({} cells) at index {} in {}",
        template.label,
        inserted.len(),
        first,
        target.display()
    );
    Ok(())
}

async fn tag_cell(
    config: &LayoutConfig,
    path: &Path,
    index: usize,
    role: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let notebook = load_notebook(path).await?;
    let mut session = NotebookSession::new(notebook);

    if !set_cell_slide(&mut session, index, role) {
        tracing::warn!(
            "{} has no cell {index} ({} cells); nothing changed",
            path.display(),
            session.cell_count()
        );
        return Ok(());
    }

    let target = output.unwrap_or(path);
    save_notebook(target, session.notebook(), config.indent).await?;

    let stored = session
        .notebook()
        .cells
        .get(index)
        .and_then(slide_role_of)
        .map_or("none", |r| r.as_str());
    println!("Cell {index} slide role: {stored}");
    Ok(())
}

fn render_menu(catalog: &Catalog) -> String {
    let mut out = String::new();
    render_menu_into(catalog, &catalog.menu(), 0, &mut out);
    out
}

fn render_menu_into(catalog: &Catalog, menu: &Menu, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{}", menu.label);
    for item in &menu.items {
        match item {
            MenuItem::Command(id) => {
                let label = catalog.get(id).map_or(id.as_str(), |c| c.label());
                let _ = writeln!(out, "{indent}  {label}  ({id})");
            }
            MenuItem::Submenu(submenu) => render_menu_into(catalog, submenu, depth + 1, out),
        }
    }
}

fn render_cells(notebook: &Notebook) -> String {
    let mut out = String::new();
    for (index, cell) in notebook.cells.iter().enumerate() {
        let role = slide_role_of(cell).map_or("-", |r| r.as_str());
        let _ = writeln!(
            out,
            "{index:>3}  {:<8}  {role:<8}  {}",
            cell.cell_type.as_str(),
            cell.first_line()
        );
    }
    out
}
