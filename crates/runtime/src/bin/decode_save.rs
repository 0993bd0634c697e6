//! Inspects entity save strings and save-slot files.
use std::io::{self, BufRead};

use anyhow::Result;
use clap::{Parser, Subcommand};
use game_content::CatalogLoader;
use game_core::{ContentError, EntityCodec, HostCatalog, TypeTables};
use runtime::{FileSaveRepository, RuntimeConfig, SaveRepository};

#[derive(Parser)]
#[command(name = "decode-save", about = "Inspect content save data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode entity save strings against the host catalog (stdin if none given)
    Entity { strings: Vec<String> },
    /// Print the unlocked tokens of every slot in the configured profile
    Slots,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();

    match Cli::parse().command {
        Command::Entity { strings } => {
            let host = match &config.host_catalog {
                Some(path) => CatalogLoader::load(path)?,
                None => HostCatalog::default(),
            };
            let types = host.type_tables();

            if strings.is_empty() {
                for line in io::stdin().lock().lines() {
                    decode_entity(&types, line?.trim());
                }
            } else {
                for raw in &strings {
                    decode_entity(&types, raw);
                }
            }
        }
        Command::Slots => {
            let repository = FileSaveRepository::new(&config.save_dir, &config.profile)?;
            match repository.load()? {
                Some(file) => {
                    for (name, slot) in file.slots() {
                        println!("{name}: {}", slot.tokens().join(", "));
                    }
                }
                None => println!("no save file at {}", repository.path().display()),
            }
        }
    }

    Ok(())
}

fn decode_entity(types: &TypeTables, raw: &str) {
    if raw.is_empty() {
        return;
    }

    let mut last_error = None;
    for table in [&types.objects, &types.creatures] {
        match EntityCodec::new(table).decode(raw) {
            Ok(record) => {
                println!(
                    "{space} {name} id={id} pos={pos} payload={payload:?}",
                    space = table.space(),
                    name = table.name_of(record.type_id()).unwrap_or("?"),
                    id = record.id(),
                    pos = record.pos(),
                    payload = record.payload(),
                );
                return;
            }
            Err(err) => last_error = Some(err),
        }
    }

    if let Some(err) = last_error {
        tracing::warn!(
            target: "runtime::decode",
            raw,
            code = err.error_code(),
            error = %err,
            "undecodable save string"
        );
    }
}
