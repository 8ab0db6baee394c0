//! circuitgen CLI - Wokwi circuit generation from the command line.

use anyhow::{bail, Context};
use circuitgen::{
    load_descriptors, Catalog, CircuitDocument, CircuitGenCore, ComponentDescriptor,
    GenerationOptions, Netlist, PinRole, ProgressiveStep,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "circuitgen")]
#[command(about = "Wokwi circuit diagram generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log generation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one circuit document
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: DocumentFormat,

        /// Write the document here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Generate cumulative build steps with instructions
    Progressive {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: StepFormat,

        /// Write step_<n>.json and step_<n>.txt into this directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Show the nets of a generated circuit
    Nets {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the component catalog
    Catalog {
        /// Show pin layouts
        #[arg(short, long)]
        details: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// JSON file holding an array of component descriptors
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Component type to append (repeatable)
    #[arg(short, long = "component", value_name = "TYPE")]
    components: Vec<String>,

    /// JSON file with generation options
    #[arg(long, value_name = "CFG")]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum DocumentFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

#[derive(Clone, ValueEnum)]
enum StepFormat {
    /// Compact JSON array of steps
    Json,
    /// Indented JSON array of steps
    Pretty,
    /// Instruction text only
    Text,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            input,
            format,
            output,
        } => handle_generate(&input, format, output.as_deref()),
        Commands::Progressive {
            input,
            format,
            out_dir,
        } => handle_progressive(&input, format, out_dir.as_deref()),
        Commands::Nets { input } => handle_nets(&input),
        Commands::Catalog { details } => {
            handle_catalog(details);
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

impl InputArgs {
    fn options(&self) -> anyhow::Result<GenerationOptions> {
        match &self.config {
            Some(path) => GenerationOptions::load(path)
                .with_context(|| format!("failed to read options from {}", path.display())),
            None => Ok(GenerationOptions::default()),
        }
    }

    /// File descriptors first, then `-c` components in the order given.
    fn descriptors(&self) -> anyhow::Result<Vec<ComponentDescriptor>> {
        let mut descriptors = match &self.file {
            Some(path) => load_descriptors(path)
                .with_context(|| format!("failed to read components from {}", path.display()))?,
            None => Vec::new(),
        };
        descriptors.extend(self.components.iter().map(ComponentDescriptor::new));

        if descriptors.is_empty() {
            bail!("no components given; pass a FILE or -c TYPE");
        }
        Ok(descriptors)
    }
}

fn handle_generate(
    input: &InputArgs,
    format: DocumentFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let options = input.options()?;
    let doc = CircuitGenCore::generate(&input.descriptors()?, &options)?;
    let json = render_document(&doc, &format)?;

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} parts and {} connections to {}",
                doc.parts.len(),
                doc.connections.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn render_document(doc: &CircuitDocument, format: &DocumentFormat) -> anyhow::Result<String> {
    Ok(match format {
        DocumentFormat::Json => doc.to_json()?,
        DocumentFormat::Pretty => doc.to_json_pretty()?,
    })
}

fn handle_progressive(
    input: &InputArgs,
    format: StepFormat,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let options = input.options()?;
    let steps = CircuitGenCore::generate_progressive(&input.descriptors()?, &options)?;

    if let Some(dir) = out_dir {
        write_steps(&steps, dir)?;
        println!("Wrote {} steps to {}", steps.len(), dir.display());
        return Ok(());
    }

    match format {
        StepFormat::Json => println!("{}", serde_json::to_string(&steps)?),
        StepFormat::Pretty => println!("{}", serde_json::to_string_pretty(&steps)?),
        StepFormat::Text => {
            for step in &steps {
                println!("{}", step.instruction_text);
            }
        }
    }
    Ok(())
}

fn write_steps(steps: &[ProgressiveStep], dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    for step in steps {
        let json_path = dir.join(format!("step_{}.json", step.step_index));
        let text_path = dir.join(format!("step_{}.txt", step.step_index));
        std::fs::write(&json_path, step.circuit_document.to_json_pretty()? + "\n")
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        std::fs::write(&text_path, &step.instruction_text)
            .with_context(|| format!("failed to write {}", text_path.display()))?;
    }
    Ok(())
}

fn handle_nets(input: &InputArgs) -> anyhow::Result<()> {
    let options = input.options()?;
    let doc = CircuitGenCore::generate(&input.descriptors()?, &options)?;
    let netlist = Netlist::from_document(&doc);

    println!(
        "{} nets, {} pins, {} wires\n",
        netlist.nets().len(),
        netlist.pin_count(),
        netlist.wire_count()
    );
    for net in netlist.nets() {
        let pins: Vec<String> = net.pins.iter().map(|p| p.to_string()).collect();
        println!("  {:<8} {}", net.name, pins.join(", "));
    }
    Ok(())
}

fn handle_catalog(details: bool) {
    let catalog = Catalog::builtin();
    println!("Available components ({}):\n", catalog.len());

    for entry in catalog.entries() {
        println!(
            "  {:<28} {:<16} {}",
            entry.type_id,
            entry.category.to_string(),
            entry.name
        );
        if !details {
            continue;
        }
        for pin in &entry.pins {
            match &pin.label {
                Some(label) => println!("      {:<6} {} ({})", pin.name, role_text(&pin.role), label),
                None => println!("      {:<6} {}", pin.name, role_text(&pin.role)),
            }
        }
        if let Some(req) = &entry.requires_passive {
            println!("      needs a {} {} on pin {}", req.display(), req.type_id, req.pin);
        }
        println!();
    }
}

fn role_text(role: &PinRole) -> String {
    match role {
        PinRole::Power(supply) => format!("power {}", supply),
        PinRole::Ground => "ground".to_string(),
        PinRole::Signal(kind) => format!("{} signal", kind),
        PinRole::Bus(line) => format!("{} bus", line),
        PinRole::NoConnect => "not connected".to_string(),
    }
}
