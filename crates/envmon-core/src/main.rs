//! `envmon` command line
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use envmon_access::{filter, Capability, CapabilitySet, NavNode, NavigationModel};
use envmon_core::{load_navigation, telemetry, Console, ConsoleConfig};
use envmon_session::{Credentials, NavigationOutcome};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("envmon")
        .version(envmon_core::VERSION)
        .about("Environmental monitoring console")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (TOML)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("menu")
                .about("Print the sidebar visible with the given abilities")
                .arg(
                    Arg::new("ability")
                        .long("ability")
                        .short('a')
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(Capability))
                        .help("Granted ability as action:resource, e.g. read:Data"),
                )
                .arg(
                    Arg::new("admin")
                        .long("admin")
                        .action(ArgAction::SetTrue)
                        .help("Grant every ability"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("routes").about("List every view"))
        .subcommand(
            Command::new("navigate")
                .about("Show where a navigation would land given the stored session")
                .arg(
                    Arg::new("target")
                        .required(true)
                        .help("Route name or path, e.g. report or /history-data"),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Log in and load every reference collection")
                .arg(Arg::new("user").long("user").short('u').required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .short('p')
                        .env("ENVMON_PASSWORD")
                        .required(true),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ConsoleConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(ConsoleConfig::default()),
    }
}

fn print_node(node: &NavNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match &node.route {
        Some(route) => println!("{indent}{} ({route})", node.title),
        None => println!("{indent}{}", node.title),
    }
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn run_menu(config: &ConsoleConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let model = match &config.navigation {
        Some(path) => load_navigation(path)?,
        None => NavigationModel::standard(),
    };

    let mut caps: CapabilitySet = args
        .get_many::<Capability>("ability")
        .into_iter()
        .flatten()
        .copied()
        .collect();
    if args.get_flag("admin") {
        caps.insert(Capability::All);
    }

    let sidebar = filter(&model, &caps);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&sidebar)?);
    } else {
        for section in &sidebar.sections {
            print_node(section, 0);
        }
    }
    Ok(())
}

fn run_routes(console: &Console) {
    for route in console.routes().iter() {
        let title = route.page_title.as_deref().unwrap_or("-");
        println!("{:<24} {:<26} {:?}\t{title}", route.name, route.path, route.layout);
    }
}

fn run_navigate(console: &Console, args: &ArgMatches) -> anyhow::Result<()> {
    let target = args
        .get_one::<String>("target")
        .context("missing navigation target")?;

    match console.navigate(target.as_str()) {
        NavigationOutcome::Proceed(route) => println!("proceed: {} ({})", route.name, route.path),
        NavigationOutcome::Redirect { to, requested } => {
            println!("redirect: {} (requested {requested})", to.name);
        }
    }
    Ok(())
}

async fn run_sync(console: &Console, args: &ArgMatches) -> anyhow::Result<()> {
    let user = args.get_one::<String>("user").context("missing user")?;
    let password = args.get_one::<String>("password").context("missing password")?;

    let landing = console
        .login(&Credentials::new(user.as_str(), password.as_str()))
        .await
        .context("login failed")?;
    println!("logged in, landing on {}", landing.route().name);

    let reference = console.reference();
    let report = reference.load_all().await;
    println!("monitors:            {}", reference.monitors.all().len());
    println!("monitor types:       {}", reference.monitor_types.all().len());
    println!("monitor type groups: {}", reference.monitor_type_groups.all().len());
    println!("tables:              {}", reference.tables.all().len());
    for data_type in reference.tables.data_types() {
        println!("  {} ({})", data_type.label, data_type.id);
    }
    for (name, err) in report.failures() {
        eprintln!("failed to load {name}: {err}");
    }

    if report.is_complete() {
        Ok(())
    } else {
        anyhow::bail!("reference data partially loaded")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    telemetry::init(&config.log);

    match matches.subcommand() {
        Some(("menu", args)) => run_menu(&config, args),
        Some(("routes", _)) => {
            run_routes(&Console::from_config(&config)?);
            Ok(())
        }
        Some(("navigate", args)) => run_navigate(&Console::from_config(&config)?, args),
        Some(("sync", args)) => run_sync(&Console::from_config(&config)?, args).await,
        _ => Ok(()),
    }
}
