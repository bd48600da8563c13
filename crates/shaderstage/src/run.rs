use std::fs;

use anyhow::{Context, Result};
use renderer::{run_window, validate_fragment, RendererConfig, SceneObject};
use stageconfig::StageConfig;
use tracing_subscriber::EnvFilter;
use uniforms::{BlockLayout, UniformRegistry};

use crate::bindings::{map_antialias, orchestrator_config, render_policy};
use crate::cli::{parse_surface_size, Cli};
use crate::defaults::{DEFAULT_PASS, DEFAULT_PASS_NAME, DEFAULT_STAGE};

/// A parsed stage with every pass source loaded.
struct Stage {
    config: StageConfig,
    passes: Vec<(String, String)>,
}

pub fn run(args: Cli) -> Result<()> {
    initialise_tracing();

    let stage = load_stage(&args)?;
    let registry = stage
        .config
        .registry()
        .context("failed to build uniform registry")?;

    if args.validate {
        return validate_stage(&stage, &registry);
    }

    let renderer_config = prepare_renderer_config(&args, &stage.config)?;
    tracing::info!(
        policy = ?renderer_config.policy,
        antialiasing = ?renderer_config.antialiasing,
        pointer_space = %renderer_config.orchestrator.bindings.pointer_space,
        "launching shader stage"
    );
    let objects = stage
        .passes
        .into_iter()
        .map(|(name, source)| SceneObject::shader_pass(name, source))
        .collect();
    run_window(renderer_config, registry, objects)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_stage(args: &Cli) -> Result<Stage> {
    let Some(path) = args.config.as_ref() else {
        tracing::debug!("no config supplied; using built-in stage");
        let config =
            StageConfig::from_toml_str(DEFAULT_STAGE).context("built-in stage is invalid")?;
        return Ok(Stage {
            config,
            passes: vec![(DEFAULT_PASS_NAME.to_string(), DEFAULT_PASS.to_string())],
        });
    };

    let config = StageConfig::from_path(path)
        .with_context(|| format!("failed to load stage config {}", path.display()))?;
    let mut passes = Vec::with_capacity(config.passes.len());
    for (name, shader) in config.resolved_passes() {
        let source = fs::read_to_string(&shader).with_context(|| {
            format!("failed to read shader for pass '{name}' at {}", shader.display())
        })?;
        tracing::debug!(pass = %name, path = %shader.display(), "loaded pass source");
        passes.push((name, source));
    }
    tracing::info!(
        config = %path.display(),
        uniforms = config.uniforms.len(),
        passes = passes.len(),
        "loaded stage config"
    );
    Ok(Stage { config, passes })
}

fn validate_stage(stage: &Stage, registry: &UniformRegistry) -> Result<()> {
    let layout = BlockLayout::for_map(registry.get_all());
    for (name, source) in &stage.passes {
        validate_fragment(&layout, source)
            .with_context(|| format!("pass '{name}' failed validation"))?;
    }

    println!("uniforms ({}):", registry.len());
    for (name, entry) in registry.get_all() {
        println!("  {name}: {}", entry.category());
    }
    println!("passes ({}):", stage.passes.len());
    for (name, _) in &stage.passes {
        println!("  {name}");
    }
    println!("block: {} bytes", layout.size());
    Ok(())
}

fn prepare_renderer_config(args: &Cli, config: &StageConfig) -> Result<RendererConfig> {
    let surface_size = match args.size.as_deref() {
        Some(value) => parse_surface_size(value)?,
        None => config.window.size(),
    };
    let antialiasing = args
        .antialias
        .or_else(|| config.window.antialias.map(map_antialias))
        .unwrap_or_default();

    let mut orchestrator = orchestrator_config(&config.bindings, &config.camera);
    if let Some(space) = args.pointer_space {
        orchestrator.bindings.pointer_space = space;
    }
    orchestrator.camera.orbit_controls |= args.orbit;

    Ok(RendererConfig {
        surface_size,
        title: config
            .window
            .title
            .clone()
            .unwrap_or_else(|| "shaderstage".to_string()),
        antialiasing,
        policy: render_policy(
            args.fps.or(config.window.fps),
            args.still_time.or(config.window.still_time),
        ),
        orchestrator,
    })
}
