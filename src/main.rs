use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use biodata_pdf::{
    BiodataRecord, Content, DrawRenderer, Error, RenderContext, RenderOptions, Renderer,
    TreeRenderer, Variant, export_filename, load_options, plan, render_chain,
};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "biodata-pdf", version, about = "Render a biodata record to a one-page PDF")]
struct Args {
    /// Biodata record (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file. Defaults to <Full_Name>_<variant>.pdf, or stdout for --emit tree
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    #[arg(short = 'v', long, value_enum, default_value = "comprehensive")]
    variant: Variant,

    /// Rendering back-end; auto tries tree first and falls back to draw
    #[arg(short = 'r', long, value_enum, default_value = "auto")]
    renderer: Backend,

    #[arg(short = 'e', long, value_enum, default_value = "pdf")]
    emit: Emit,

    /// Render options JSON (page geometry, metrics, theme, fonts)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Font family to embed instead of Helvetica
    #[arg(long)]
    font_family: Option<String>,

    /// Extra directory to search for font files (repeatable)
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

const TREE: &dyn Renderer = &TreeRenderer;
const DRAW: &dyn Renderer = &DrawRenderer;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Backend {
    Tree,
    Draw,
    Auto,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Emit {
    Pdf,
    Tree,
}

fn read_record(path: &Path) -> Result<BiodataRecord, Error> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(BiodataRecord::from_json(&json)?)
}

fn options(args: &Args) -> Result<RenderOptions, Error> {
    let mut options = load_options(args.config.as_deref())?;
    if let Some(family) = &args.font_family {
        options.font_family = Some(family.clone());
    }
    // Directories given on the command line are searched first.
    let mut dirs = args.font_dirs.clone();
    dirs.append(&mut options.font_dirs);
    options.font_dirs = dirs;
    Ok(options)
}

fn run(args: &Args) -> Result<(), Error> {
    let record = read_record(&args.input)?;
    let options = options(args)?;
    let ctx = RenderContext::now();
    let content = Content::new(&record, ctx.today());
    let plan = plan(&content, args.variant, ctx.generated_at)?;

    if let Emit::Tree = args.emit {
        let tree = biodata_pdf::tree::build_tree(&plan, &options);
        let json = serde_json::to_string_pretty(&tree)?;
        match &args.output {
            Some(path) => std::fs::write(path, json)?,
            None => writeln!(io::stdout(), "{json}")?,
        }
        return Ok(());
    }

    let chain: &[&dyn Renderer] = match args.renderer {
        Backend::Tree => &[TREE],
        Backend::Draw => &[DRAW],
        Backend::Auto => &[TREE, DRAW],
    };
    let bytes = render_chain(&plan, &options, chain)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export_filename(&plan.title, args.variant)));
    std::fs::write(&output, &bytes)?;
    println!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("could not generate document: {e}");
            ExitCode::FAILURE
        }
    }
}
