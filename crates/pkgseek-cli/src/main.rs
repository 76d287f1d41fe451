use std::path::PathBuf;

use clap::Parser;
use cli::{Args, Commands};
use logging::setup_logging;
use nu_ansi_term::Color::{Blue, Cyan, Green, LightRed, Red, Yellow};
use pkgseek_config::{config::Settings, pacman::PacmanConf};
use pkgseek_core::{
    compute_upgrades, get_info, open_handle, search_repos, SearchBy, SearchMode, SearchQuery,
    SeekResult, TempSync,
};
use pkgseek_db::DbHandle;
use tracing::{debug, error, info, warn};
use utils::{format_date, print_json, set_color, Colored};

mod cli;
mod logging;
mod utils;

fn open(args: &Args, settings: &Settings) -> SeekResult<DbHandle> {
    let pacman_config = args
        .pacman_config
        .clone()
        .unwrap_or_else(|| settings.pacman_config.clone());
    let repos = if args.repos.is_empty() {
        settings.repositories.clone()
    } else {
        args.repos.clone()
    };

    if args.temp_db || settings.use_temp_db {
        let syncer = TempSync::for_current_user();
        info!(
            "Syncing repository databases into {}",
            Colored(Cyan, syncer.dir().display())
        );
        return syncer.sync(&pacman_config, &repos);
    }

    let conf = PacmanConf::from_file(&pacman_config)?;
    let root = args.root.as_ref().map(PathBuf::from).unwrap_or(conf.root_dir);
    let db_path = args
        .dbpath
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or(conf.db_path);

    open_handle(root, db_path, &pacman_config, &repos)
}

fn search(handle: &DbHandle, args: &Args, query: SearchQuery) -> SeekResult<()> {
    let results = search_repos(Some(handle), &query)?;
    debug!(count = results.len(), "search finished");

    if args.json {
        print_json(&results);
        return Ok(());
    }

    for pkg in &results {
        let state = if pkg.is_installed { "+" } else { "-" };
        info!(
            "[{}] {}/{} {}",
            state,
            Colored(Green, &pkg.source),
            Colored(Blue, &pkg.name),
            format_date(pkg.last_modified),
        );
    }

    if results.is_empty() {
        info!("No packages found");
    } else if results.len() == query.max_results {
        info!("Showing the first {} results", query.max_results);
    }
    Ok(())
}

fn upgrades(handle: &DbHandle, args: &Args) {
    let (upgrades, not_found) = compute_upgrades(Some(handle));

    if args.json {
        print_json(&serde_json::json!({
            "upgrades": upgrades,
            "not_found": not_found,
        }));
        return;
    }

    for upgrade in upgrades.iter().filter(|u| !u.version.is_empty()) {
        info!(
            "{}/{} {} -> {}",
            Colored(Green, &upgrade.source),
            Colored(Blue, &upgrade.name),
            Colored(LightRed, &upgrade.local_version),
            Colored(Green, &upgrade.version),
        );
    }

    if !not_found.is_empty() {
        info!(
            "{} {}",
            Colored(Yellow, "Not found in any repository:"),
            not_found.join(" ")
        );
    }
}

fn info_cmd(handle: &DbHandle, args: &Args, packages: &[String]) {
    let result = get_info(Some(handle), packages);

    if args.json {
        print_json(&result);
        return;
    }

    if result.is_error() {
        error!("{}", result.error);
        return;
    }

    for missing in packages
        .iter()
        .filter(|name| !result.results.iter().any(|r| &r.name == *name))
    {
        warn!("Package {} not found", Colored(Red, missing));
    }

    let field = |label: &str, value: &str| {
        info!("{:<16}: {}", Colored(Cyan, label), value);
    };
    let list = |values: &[String]| {
        if values.is_empty() {
            "None".to_string()
        } else {
            values.join("  ")
        }
    };

    for record in &result.results {
        field("Name", &record.name);
        field("Version", &record.version);
        field("Description", &record.description);
        field("Repository", &record.source);
        field("Architecture", &record.architecture);
        field("URL", &record.url);
        field("Licenses", &list(&record.license));
        field("Depends On", &list(&record.depends));
        field("Optional Deps", &list(&record.opt_depends));
        field("Make Deps", &list(&record.make_depends));
        field("Check Deps", &list(&record.check_depends));
        field("Required By", &list(&record.required_by));
        field("Package Base", &record.package_base);
        field("Packager", &record.maintainer);
        field("Build Date", &format_date(record.last_modified));
        info!("");
    }
}

fn handle_cli() -> SeekResult<()> {
    let args = Args::parse();

    setup_logging(&args);
    if args.no_color {
        set_color(false);
    }

    let settings = Settings::load(args.config.as_ref().map(PathBuf::from))?;
    debug!(?settings, "loaded settings");

    let handle = open(&args, &settings)?;

    match &args.command {
        Commands::Search {
            term,
            contains,
            desc,
            limit,
            local,
        } => {
            let query = SearchQuery {
                mode: if *contains {
                    SearchMode::Contains
                } else {
                    settings.search_mode
                },
                by: if *desc {
                    SearchBy::NameAndDescription
                } else {
                    settings.search_by
                },
                max_results: limit.unwrap_or(settings.max_results),
                local_only: *local,
                ..SearchQuery::new(term.as_str())
            };
            search(&handle, &args, query)?;
        }
        Commands::Upgrades => upgrades(&handle, &args),
        Commands::Info { packages } => info_cmd(&handle, &args, packages),
    }

    handle.close();
    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
