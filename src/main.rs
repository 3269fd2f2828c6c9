use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;
use workflow_synth::cli::commands::{MergeCommand, SynthesizeCommand, TriggerCommand, ValidateCommand};
use workflow_synth::cli::output::*;
use workflow_synth::cli::{Cli, Command};
use workflow_synth::core::config::Landscape;
use workflow_synth::core::{translate, WorkflowDocument};
use workflow_synth::synthesis::{merge_stage, Module, PipelineSynthesizer};

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    let result = match &cli.command {
        Command::Synthesize(cmd) => synthesize(cmd),
        Command::Merge(cmd) => merge(cmd),
        Command::Validate(cmd) => validate_landscape(cmd),
        Command::Trigger(cmd) => show_trigger(cmd),
    };

    if let Err(e) = result {
        println!("{} {}", CROSS, style(format!("{:#}", e)).red());
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn synthesize(cmd: &SynthesizeCommand) -> Result<()> {
    let landscape = Landscape::from_file(&cmd.landscape)
        .with_context(|| format!("Failed to load landscape {}", cmd.landscape))?;
    if landscape.engine()?.is_none() {
        println!("{} No CI/CD engine configured, nothing to synthesize", WARN);
        return Ok(());
    }

    let mut module = Module::new("cli");
    for fragment in &cmd.fragment {
        module = module.with_fragment(fragment);
    }
    if let Some(dir) = &cmd.fragment_dir {
        for file in Module::from_dir("cli", dir)?.fragment_files() {
            module = module.with_fragment(file.clone());
        }
    }

    let fragments = module
        .load_fragments()
        .context("Failed to load workflow fragments")?;
    println!(
        "{} Loaded {} fragment(s) for {} environment(s)",
        INFO,
        style(fragments.len()).cyan(),
        style(landscape.environments.len()).cyan()
    );

    let mut synthesizer = PipelineSynthesizer::new(&landscape, &cmd.workflows_root);
    if let Some(name) = &cmd.name {
        synthesizer = synthesizer.with_workflow_name(name);
    }

    for env in &landscape.environments {
        let outcome = synthesizer
            .synthesize_environment(env, &fragments)
            .with_context(|| format!("Failed to synthesize environment '{}'", env.name))?;
        for report in outcome.reports.iter().filter(|r| r.changed() || !r.skipped_ids.is_empty()) {
            println!("  {}", format_merge_report(report));
        }
        println!("{}", format_outcome(&outcome));
    }

    Ok(())
}

fn merge(cmd: &MergeCommand) -> Result<()> {
    let mut base = WorkflowDocument::load(&cmd.base)
        .with_context(|| format!("Failed to load workflow {}", cmd.base))?;
    let fragment = WorkflowDocument::load(&cmd.fragment)
        .with_context(|| format!("Failed to load fragment {}", cmd.fragment))?;

    let stages: Vec<String> = if cmd.stage.is_empty() {
        fragment.stage_names().into_iter().map(str::to_string).collect()
    } else {
        cmd.stage.clone()
    };

    for stage in &stages {
        let report = merge_stage(&mut base, stage, &fragment);
        println!("{}", format_merge_report(&report));
    }

    if cmd.dry_run {
        base.refresh_execution_flags();
        print!("{}", base.to_yaml()?);
    } else {
        base.save()?;
        println!(
            "{} Saved {}",
            CHECK,
            style(Path::new(&cmd.base).display()).bold()
        );
    }

    Ok(())
}

fn validate_landscape(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating landscape...", INFO);

    let landscape = Landscape::from_file(&cmd.landscape)?;
    let engine = landscape.engine()?;

    println!("{} Landscape configuration is valid!", CHECK);
    match &landscape.cicd {
        Some(cicd) => println!("  CI/CD: {}", style(cicd).bold()),
        None => println!("  {} No CI/CD engine configured", WARN),
    }
    for env in &landscape.environments {
        println!(
            "  {}: {} {} → {}",
            style(&env.name).bold(),
            style(&env.config.match_event).cyan(),
            style(&env.config.match_branch).dim(),
            env.config.stages.join(" → ")
        );
    }

    if cmd.json {
        let environments: Vec<_> = landscape
            .environments
            .iter()
            .map(|env| {
                serde_json::json!({
                    "name": env.name,
                    "config": env.config,
                })
            })
            .collect();
        let data = serde_json::json!({
            "cicd": landscape.cicd,
            "engine_supported": engine.is_some(),
            "environments": environments,
        });
        println!("\n{}", serde_json::to_string_pretty(&data)?);
    }

    Ok(())
}

fn show_trigger(cmd: &TriggerCommand) -> Result<()> {
    let trigger = translate(&cmd.event, &cmd.pattern)?;
    let value = trigger.to_value();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "{} {} trigger for {}",
            INFO,
            style(trigger.event_kind()).cyan(),
            style(&cmd.pattern).dim()
        );
        let mut document = WorkflowDocument::new("");
        document.trigger = Some(value);
        let yaml = document.to_yaml()?;
        // Only the `on:` block, not the empty jobs mapping
        for line in yaml.lines().take_while(|line| !line.starts_with("jobs")) {
            println!("{}", line);
        }
    }

    Ok(())
}
