use anyhow::{Context, Result, bail};
use clap::Parser;
use extapi::store::ApiStore;
use extapi::{cli, config, watch};
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = config::get();
    let schema_path = args.schema.unwrap_or_else(|| config.schema_path.clone());
    let store =
        ApiStore::open(&schema_path).with_context(|| format!("open {}", schema_path.display()))?;
    let api = store.snapshot();

    match args.command {
        cli::Command::Info => print_json(&api.info()),
        cli::Command::Route { query } => print_json(&api.route(&query)),
        cli::Command::Class { name } => print_json(&api.class_summary(&name)),
        cli::Command::Method { name, class } => {
            print_json(&api.methods_by_name(&name, class.as_deref()))
        }
        cli::Command::Hash { hash } => print_json(&api.method_by_hash(&hash)),
        cli::Command::Builtin { name } => match name {
            Some(name) => print_json(&api.builtin(&name)),
            None => print_json(&api.builtin_names()),
        },
        cli::Command::Layout { name, config: cfg } => {
            ensure_recognized_config(&cfg)?;
            print_json(&api.builtin_layout(&name, &cfg))
        }
        cli::Command::Offset {
            name,
            member,
            config: cfg,
        } => {
            ensure_recognized_config(&cfg)?;
            match api.builtin_member_offset(&name, &member, &cfg) {
                Some(offset) => print_json(&json!({ "offset": offset })),
                None => print_json(&serde_json::Value::Null),
            }
        }
        cli::Command::Enum { name } => {
            if name.contains('.') {
                print_json(&api.class_enum(&name))
            } else {
                print_json(&api.global_enum(&name))
            }
        }
        cli::Command::Utility { name, category } => {
            print_json(&api.utility(name.as_deref(), category.as_deref()))
        }
        cli::Command::Constant { name } => match name {
            Some(name) => print_json(&api.global_constant(&name)),
            None => print_json(&api.global_constant_names()),
        },
        cli::Command::Singletons => print_json(api.singletons()),
        cli::Command::Native { name } => match name {
            Some(name) => print_json(&api.native_struct(&name)),
            None => print_json(&api.native_struct_names()),
        },
        cli::Command::Watch => {
            drop(api);
            let store = Arc::new(store);
            eprintln!(
                "extapi: watching {} (version {})",
                schema_path.display(),
                store.snapshot().version()
            );
            let _handle = watch::start(
                Arc::clone(&store),
                watch::WatchConfig::new(config.watch_debounce_ms),
            )?;
            // block until interrupted; the watcher thread does the work
            loop {
                std::thread::park();
            }
        }
    }
}

fn ensure_recognized_config(name: &str) -> Result<()> {
    let config = config::get();
    if !config.recognizes_build_config(name) {
        bail!(
            "unknown build configuration '{name}', recognized: {}",
            config.build_configs.join(", ")
        );
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
