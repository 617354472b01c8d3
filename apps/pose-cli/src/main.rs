use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::Path;
use tracing::info;

use pose_control::{
    default_resolvers, interpolate_with, PoseController, PoseFacade, PoseMetrics, RotationBlend,
};
use pose_core::{convert, HumanoidRig, MockRig, Pose, PoseDefinition, PoseError};
use pose_registry::{shared, FileSource, PoseRegistry, PoseSink, PoseSource, SharedRegistry};

mod config;
use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "pose",
    version,
    about = "Humanoid pose presets: list, convert, apply and blend",
    disable_help_subcommand = true
)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "pose-cli.json", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List stored presets
    List,
    /// Print one preset as an interchange envelope
    Show {
        /// Preset key or display name
        name: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Read an interchange file and write it back in canonical form
    Convert {
        input: String,
        #[arg(long)]
        output: Option<String>,
    },
    /// Apply a preset or an uploaded file to a mock rig and print the joints it changed
    Apply {
        /// Preset key, display name, or path to a pose file
        target: String,
        /// Print Prometheus metrics afterwards
        #[arg(long, action = ArgAction::SetTrue)]
        metrics: bool,
    },
    /// Blend two presets
    Interpolate {
        from: String,
        to: String,
        #[arg(long, default_value_t = 0.5)]
        t: f32,
        /// linear, normalized or spherical (default from config)
        #[arg(long)]
        blend: Option<RotationBlend>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Check that a pose file, directory or manifest loads cleanly
    Validate {
        locator: String,
        /// Treat the locator as a manifest even if it is a file
        #[arg(long, action = ArgAction::SetTrue)]
        manifest: bool,
    },
    /// Write a config file with default values
    ConfigInit {
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    if let Commands::ConfigInit { force } = cli.command {
        return config_init(&cli.config, force);
    }
    let cfg = Config::load(&cli.config)?;
    let metrics = PoseMetrics::new().map_err(anyhow::Error::msg)?;
    let facade = open_facade(&cfg, metrics.clone()).await?;

    match cli.command {
        Commands::List => {
            for (key, def) in facade.registry().read().entries() {
                println!(
                    "{key:<16} {:<20} {:>3} joints  {}",
                    def.name,
                    def.pose.len(),
                    def.description
                );
            }
            Ok(())
        }
        Commands::Show { name, output } => {
            let def = resolve(facade.registry(), &name)?;
            emit(&convert::serialize_definition(&def)?, output.as_deref()).await
        }
        Commands::Convert { input, output } => {
            convert_file(facade, &input, output.as_deref()).await
        }
        Commands::Apply { target, metrics: show } => {
            apply(&cfg, facade.registry().clone(), &target, metrics.clone()).await?;
            if show {
                print!("{}", metrics.encode_text());
            }
            Ok(())
        }
        Commands::Interpolate {
            from,
            to,
            t,
            blend,
            output,
        } => {
            let a = resolve(facade.registry(), &from)?;
            let b = resolve(facade.registry(), &to)?;
            let pose = interpolate_with(&a.pose, &b.pose, t, blend.unwrap_or(cfg.blend));
            emit(&convert::serialize(&pose)?, output.as_deref()).await
        }
        Commands::Validate { locator, manifest } => validate(&locator, manifest).await,
        Commands::ConfigInit { .. } => Ok(()),
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn config_init(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        bail!("{path} already exists (use --force to overwrite)");
    }
    Config::default().save(path)?;
    println!("wrote {path}");
    Ok(())
}

fn source_for(locator: &str) -> Result<Box<dyn PoseSource>> {
    #[cfg(feature = "http")]
    if locator.starts_with("http://") || locator.starts_with("https://") {
        return Ok(Box::new(pose_registry::HttpSource::new()?));
    }
    let _ = locator;
    Ok(Box::new(FileSource))
}

/// Built-in presets plus whatever the config points at.
async fn open_facade(cfg: &Config, metrics: PoseMetrics) -> Result<PoseFacade> {
    let facade = PoseFacade::new(shared(PoseRegistry::with_defaults())).with_metrics(metrics);
    for locator in cfg.poses_dir.iter().chain(cfg.manifest.iter()) {
        let source = source_for(locator)?;
        let n = facade
            .load_many_from_source(source.as_ref(), locator)
            .await
            .with_context(|| format!("loading poses from {locator}"))?;
        info!(locator = %locator, loaded = n, "merged poses");
    }
    Ok(facade)
}

fn resolve(registry: &SharedRegistry, identifier: &str) -> Result<PoseDefinition> {
    let reg = registry.read();
    default_resolvers()
        .iter()
        .find_map(|r| r.resolve(&reg, identifier).cloned())
        .ok_or_else(|| PoseError::PoseNotFound(identifier.to_string()).into())
}

async fn emit(text: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => FileSource.store_text(path, text).await?,
        None => println!("{text}"),
    }
    Ok(())
}

async fn convert_file(mut facade: PoseFacade, input: &str, output: Option<&str>) -> Result<()> {
    let source = source_for(input)?;
    let def = facade.load_from_source(source.as_ref(), input).await?;
    info!(name = %def.name, joints = def.pose.len(), "converted");
    match output {
        Some(path) => facade.save_to_source(&FileSource, path).await?,
        None => println!("{}", convert::serialize(&def.pose)?),
    }
    Ok(())
}

async fn apply(
    cfg: &Config,
    registry: SharedRegistry,
    target: &str,
    metrics: PoseMetrics,
) -> Result<()> {
    let mut controller = PoseController::new(MockRig::new(), registry)
        .with_blend(cfg.blend)
        .with_metrics(metrics);

    let is_file = tokio::fs::metadata(target)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if target.ends_with(".json") && is_file {
        let text = FileSource
            .fetch_text(target)
            .await
            .with_context(|| format!("reading {target}"))?;
        if cfg.reset_on_upload {
            controller.apply_uploaded(&text)?;
        } else {
            controller.apply_pose(&convert::parse(&text)?, false)?;
        }
    } else {
        controller.apply_pose_by_name(target)?;
    }

    let rig = controller.rig().context("rig was unbound")?;
    let changed: Pose = rig
        .read_runtime_pose()
        .into_iter()
        .filter(|(_, t)| !t.is_identity())
        .collect();
    println!("{}", convert::serialize(&changed)?);
    Ok(())
}

async fn validate(locator: &str, manifest: bool) -> Result<()> {
    let source = source_for(locator)?;
    if manifest || Path::new(locator).is_dir() {
        let facade = PoseFacade::new(shared(PoseRegistry::new()));
        let n = facade.load_many_from_source(source.as_ref(), locator).await?;
        for def in facade.list_all() {
            println!("ok  {:<20} {:>3} joints", def.name, def.pose.len());
        }
        println!("{n} pose(s) valid");
    } else {
        let def = pose_registry::load_from_source(source.as_ref(), locator).await?;
        if def.pose.is_empty() {
            println!("warning: {locator} defines no joints");
        }
        println!("ok  {:<20} {:>3} joints", def.name, def.pose.len());
    }
    Ok(())
}
