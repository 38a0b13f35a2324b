use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use terminal_size::{terminal_size, Width};

use lister::cli::ListerArgs;
use lister::path::{OsPathResolver, PathResolver, VPath};
use lister::provider::{DirectoryProvider, OsDirectoryProvider};
use lister::render::print_listing;
use lister::sort::{sort_entries, SortKey};
use lister::filter_entries;

const DEFAULT_TERM_WIDTH: usize = 80;

fn main() -> Result<ExitCode> {
    let args = ListerArgs::parse();

    let detected_width = terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERM_WIDTH);
    let color = io::stdout().is_terminal();
    let config = args.to_config(detected_width, color);

    let resolver = OsPathResolver;
    let provider = OsDirectoryProvider;

    let paths: Vec<VPath> = if args.paths.is_empty() {
        vec![resolver.current_directory()]
    } else {
        args.paths.iter().map(VPath::new).collect()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;

    for (index, raw) in paths.iter().enumerate() {
        let mut path = raw.clone();
        path.normalize(&resolver);
        path.resolve_absolute(&resolver);

        match provider.list(&path) {
            Ok(mut listing) => {
                filter_entries(&mut listing, config.show_all);
                // Name pass first so ties under the selected key stay in
                // name order.
                sort_entries(&mut listing, SortKey::Name);
                sort_entries(&mut listing, config.sort_key);

                print_listing(&mut out, &listing, &config)
                    .with_context(|| format!("failed writing listing for '{}'", listing.path))?;
                if index + 1 < paths.len() {
                    writeln!(out)?;
                }
                out.flush()?;
            }
            Err(err) => {
                report(&err.to_string());
                failures += 1;
            }
        }
    }

    Ok(if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn report(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{} {}", style("lister:").red().bold(), message);
    } else {
        eprintln!("lister: {}", message);
    }
}
