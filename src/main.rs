use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kira_initsens::analysis::nonzero::nonzero_indices;
use kira_initsens::cli::{AnalyzeArgs, Cli, Commands, SpeciesArgs, ValidateArgs};
use kira_initsens::ctx::Ctx;
use kira_initsens::io;
use kira_initsens::model::{self, ModelDefinition};
use kira_initsens::params::{DirParamStore, ParameterStore};
use kira_initsens::pipeline::Pipeline;
use kira_initsens::sim::Simulator;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args)?,
        Commands::Species(args) => handle_species(args)?,
        Commands::Validate(args) => handle_validate(args)?,
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    if !args.rate.is_finite() || args.rate <= 0.0 || args.rate == 1.0 {
        anyhow::bail!("--rate must be positive and different from 1 (got {})", args.rate);
    }
    let mut ctx = Ctx::new(
        args.model,
        args.metric.into(),
        args.style.into(),
        args.rate,
        args.json,
        args.tsv,
    );
    Pipeline::analysis().run(&mut ctx)?;

    let summary = io::summary::format_summary(&ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn handle_species(args: SpeciesArgs) -> Result<()> {
    let model = model::load_model(&args.model)?;
    let y0 = model.initial_values();
    println!("species (model {}):", model.name);
    for (idx, name) in model.species().iter().enumerate() {
        let flag = if y0[idx] != 0.0 { "nonzero" } else { "zero" };
        println!("{}\t{}\t{}\t{}", idx, name, y0[idx], flag);
    }
    match nonzero_indices(&y0) {
        Ok(idx) => println!("nonzero initial conditions: {}", idx.len()),
        Err(err) => println!("{}", err),
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let model = model::load_model(&args.model)?;
    let nonzero_idx = nonzero_indices(&model.initial_values())?;
    let store = DirParamStore::new(&args.model, &model);
    let paramsets = store.accepted()?;
    let first = *paramsets
        .first()
        .with_context(|| format!("no accepted parameter sets in {}", store.out_dir().display()))?;
    let set = store.load(first)?;
    model
        .simulate(&set.params, &set.initial_values)
        .with_context(|| format!("baseline simulation of parameter set {} failed", first))?;

    println!("kira-initsens validate ok");
    println!("model: {}", model.name);
    println!("species: {}", model.species().len());
    println!("nonzero initial conditions: {}", nonzero_idx.len());
    println!("observables: {}", model.observables().len());
    println!("conditions: {}", model.conditions().len());
    println!("parameter sets: {}", paramsets.len());
    Ok(())
}
