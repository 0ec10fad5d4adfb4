//! inspector-demo - Nethercore inspector demo host
//!
//! Runs a small simulated scene and drives the inspector against it from
//! the command line: list classes, show and edit members, invoke methods,
//! watch values change while the scene plays, and export values.

mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use nethercore_inspector::{
    DebugRegistry, DebugValue, InspectorConfig, InspectorSession, LifecycleEvent, MemberInfo,
    MemberKind, config, export,
};

use scene::Scene;

#[derive(Parser)]
#[command(name = "inspector-demo")]
#[command(about = "Inspect a simulated Nethercore scene")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List inspectable classes
    List,

    /// Show members and current values of one instance
    Show {
        /// Class display name or type name
        class: String,

        /// Instance index
        #[arg(short, long, default_value_t = 0)]
        instance: usize,
    },

    /// Set a field or property, then show the instance
    Set {
        class: String,
        member: String,
        value: String,

        #[arg(short, long, default_value_t = 0)]
        instance: usize,
    },

    /// Invoke a method; missing arguments use the parameter defaults
    Invoke {
        class: String,
        method: String,
        args: Vec<String>,

        #[arg(short, long, default_value_t = 0)]
        instance: usize,
    },

    /// Step the scene and print values as they change
    Watch {
        class: String,

        #[arg(short, long, default_value_t = 0)]
        instance: usize,

        /// Number of steps
        #[arg(long, default_value_t = 5)]
        steps: u32,

        /// Seconds per step
        #[arg(long, default_value_t = 0.5)]
        dt: f32,
    },

    /// Export current values as Rust constants or JSON
    Export {
        class: String,

        #[arg(short, long, default_value_t = 0)]
        instance: usize,

        /// Emit JSON instead of Rust
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => config::load(),
    };

    let scene = Scene::new();
    let registry = DebugRegistry::with_config(
        nethercore_inspector::LinkedCatalog,
        config.registry.clone(),
    );
    registry.subscribe(|update| {
        tracing::debug!(
            generation = update.generation,
            classes = update.classes.len(),
            "registry rebuilt"
        );
    });

    match cli.command {
        Commands::List => list(&registry),
        Commands::Show { class, instance } => {
            let mut session = open(&config, &registry, &scene, &class, instance)?;
            show(&mut session, &scene);
            Ok(())
        }
        Commands::Set {
            class,
            member,
            value,
            instance,
        } => {
            let mut session = open(&config, &registry, &scene, &class, instance)?;
            let info = find_member(&session, &member, false)?;
            let value = parse_value(&info, &value)?;
            session.edit(&scene.world, &member, value)?;
            show(&mut session, &scene);
            Ok(())
        }
        Commands::Invoke {
            class,
            method,
            args,
            instance,
        } => {
            let mut session = open(&config, &registry, &scene, &class, instance)?;
            let info = find_member(&session, &method, true)?;
            if args.len() > info.parameters().len() {
                bail!(
                    "{} takes {} argument(s), got {}",
                    info.display_name,
                    info.parameters().len(),
                    args.len()
                );
            }
            for (index, (text, parameter)) in args.iter().zip(info.parameters()).enumerate() {
                let value = parameter.value_type.parse(text).with_context(|| {
                    format!("'{text}' is not a valid {}", parameter.value_type)
                })?;
                if !session.set_argument(&method, index, value) {
                    bail!("argument {index} of {} was not accepted", info.display_name);
                }
            }

            let result = session.invoke(&scene.world, &method)?;
            println!("{} -> {}", info.display_name, session.format_value(Some(&result)));
            Ok(())
        }
        Commands::Watch {
            class,
            instance,
            steps,
            dt,
        } => {
            let mut session = open(&config, &registry, &scene, &class, instance)?;
            watch(&mut session, &registry, &scene, steps, dt);
            Ok(())
        }
        Commands::Export {
            class,
            instance,
            json,
        } => {
            let session = open(&config, &registry, &scene, &class, instance)?;
            let (Some(info), Some(object)) = (
                session.selected_class(),
                session.selected_instance(&scene.world),
            ) else {
                bail!("no live {class} instance");
            };
            if json {
                println!("{}", export::export_as_json(&info, &object));
            } else {
                print!("{}", export::export_as_rust(&info, &object));
            }
            Ok(())
        }
    }
}

fn list(registry: &DebugRegistry) -> Result<()> {
    let mut category: Option<&str> = None;
    let classes = registry.classes();
    for class in classes.iter() {
        if class.category.as_deref() != category {
            category = class.category.as_deref();
            if let Some(category) = category {
                println!("[{category}]");
            }
        }
        println!(
            "  {} ({}, {} members)",
            class.display_name,
            class.type_key.name(),
            class.members.len()
        );
    }
    Ok(())
}

/// Start a session with `class` and instance `instance` selected
fn open(
    config: &InspectorConfig,
    registry: &DebugRegistry,
    scene: &Scene,
    class: &str,
    instance: usize,
) -> Result<InspectorSession> {
    let mut session = InspectorSession::new(config.session.clone());
    session.sync(registry);
    if !session.select_class_named(class) {
        bail!("unknown class '{class}' (see `inspector-demo list`)");
    }
    if session.select_instance(&scene.world, instance).is_none() {
        bail!("no live {class} instance");
    }
    Ok(session)
}

fn find_member(session: &InspectorSession, name: &str, method: bool) -> Result<MemberInfo> {
    let class = session
        .selected_class()
        .context("no class selected")?;
    let member = if method {
        class.member(name, MemberKind::Method)
    } else {
        class
            .member_named(name)
            .filter(|m| m.kind != MemberKind::Method)
    };
    match member {
        Some(member) => Ok(member.as_ref().clone()),
        None => {
            let kind = if method { "method" } else { "member" };
            bail!("{} has no {kind} '{name}'", class.display_name)
        }
    }
}

fn parse_value(member: &MemberInfo, text: &str) -> Result<DebugValue> {
    member
        .value_type
        .parse(text)
        .with_context(|| format!("'{text}' is not a valid {}", member.value_type))
}

fn show(session: &mut InspectorSession, scene: &Scene) {
    session.refresh_values(&scene.world);

    let labels = session.instance_labels(&scene.world);
    if let Some(label) = labels.get(session.selected_instance_index()) {
        println!("{label}");
    }

    for section in session.sections() {
        if let Some(category) = &section.category {
            println!("  [{category}]");
        }
        for member in &section.members {
            let value = match member.kind {
                MemberKind::Method => {
                    let params: Vec<String> = member
                        .parameters()
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.value_type))
                        .collect();
                    format!("fn({}) -> {}", params.join(", "), member.value_type)
                }
                _ => session.format_value(session.value(&member.name)),
            };
            let flag = if member.read_only && member.kind != MemberKind::Method {
                " (read-only)"
            } else {
                ""
            };
            println!("    {:<24} {value}{flag}", member.display_name);
        }
    }
}

fn watch(
    session: &mut InspectorSession,
    registry: &DebugRegistry,
    scene: &Scene,
    steps: u32,
    dt: f32,
) {
    // Polling only happens while the host is playing
    session.poll(&scene.world);
    scene.world.set_playing(true);
    registry.on_lifecycle(LifecycleEvent::EnteredPlayMode);
    session.sync(registry);

    for step in 1..=steps {
        scene.step(dt);
        let changed = session.poll(&scene.world);
        if changed.is_empty() {
            continue;
        }
        let values: Vec<String> = changed
            .iter()
            .map(|name| format!("{name}={}", session.format_value(session.value(name))))
            .collect();
        println!("step {step}: {}", values.join(" "));
    }

    scene.world.set_playing(false);
    registry.on_lifecycle(LifecycleEvent::ExitingPlayMode);
}
