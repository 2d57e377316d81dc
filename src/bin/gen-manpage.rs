//! Man page generator for sensorcli
//!
//! Writes `sensorcli.1` plus one page per subcommand (`sensorcli-dump.1`,
//! `sensorcli-config-set.1`, ...).
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::{Command, CommandFactory};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

/// Render `cmd` as `<name>.1` and recurse into its subcommands
fn render_pages(cmd: &Command, name: &str, dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .title(name.to_uppercase())
        .render(&mut buffer)?;

    let path = dir.join(format!("{}.1", name));
    fs::write(&path, buffer)?;

    let mut pages = vec![path];
    for sub in cmd.get_subcommands().filter(|sub| sub.get_name() != "help") {
        let sub_name = format!("{}-{}", name, sub.get_name());
        pages.extend(render_pages(sub, &sub_name, dir)?);
    }
    Ok(pages)
}

fn main() -> io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();
    let pages = render_pages(&cmd, &name, &output_dir)?;

    for page in &pages {
        println!("Man page generated at: {}", page.display());
    }
    println!("\nTo view the main page:");
    println!("  man -l {}", output_dir.join(format!("{}.1", name)).display());

    Ok(())
}
