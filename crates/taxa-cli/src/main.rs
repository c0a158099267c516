//! `taxa`: operator CLI for the taxonomy service

mod output;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use output::Format;
use std::path::PathBuf;
use std::sync::Arc;
use taxa_client::{resolve_ancestry, CachedTaxonomyService, ClientConfig, HttpTaxonomyService, TaxonomyService};
use taxa_core::{NewTaxon, NodeId, TaxonomicRank};
use taxa_selector::ChainSelector;
use tracing_subscriber::EnvFilter;

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn rank_arg() -> Arg {
    Arg::new("rank")
        .long("rank")
        .required(true)
        .value_parser(value_parser!(TaxonomicRank))
        .help("Taxonomic rank, e.g. GENUS or genus")
}

fn name_arg() -> Arg {
    Arg::new("name").long("name").required(true).help("Display name")
}

fn cli() -> Command {
    Command::new("taxa")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse and edit the plant taxonomy tree")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML client configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Taxonomy service root; overrides the config file and TAXA_API_URL"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print machine-readable JSON"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("ranks").about("Print the fixed rank order"))
        .subcommand(
            Command::new("list")
                .about("List every node at a rank")
                .arg(rank_arg()),
        )
        .subcommand(
            Command::new("children")
                .about("List the immediate children of a node")
                .arg(id_arg("parent", "Parent node id")),
        )
        .subcommand(
            Command::new("show")
                .about("Show a single node")
                .arg(id_arg("id", "Node id")),
        )
        .subcommand(
            Command::new("create")
                .about("Create a node")
                .arg(rank_arg())
                .arg(name_arg())
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .help("Parent node id; required below the root rank"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a node")
                .arg(id_arg("id", "Node id"))
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a node and, on the service side, its subtree")
                .arg(id_arg("id", "Node id")),
        )
        .subcommand(
            Command::new("lineage")
                .about("Rebuild a node's ancestry and show the selector chain for it")
                .arg(id_arg("id", "Terminal node id")),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Flags win over everything loaded before them
fn apply_flags(mut config: ClientConfig, matches: &ArgMatches) -> ClientConfig {
    if let Some(url) = matches.get_one::<String>("base-url") {
        config.base_url.clone_from(url);
    }
    config
}

fn load_config(matches: &ArgMatches) -> Result<ClientConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let config = config.with_env().context("invalid TAXA_* environment")?;
    let config = apply_flags(config, matches);
    config.validate().context("invalid client configuration")?;
    Ok(config)
}

fn connect(config: &ClientConfig) -> Result<Arc<dyn TaxonomyService>> {
    let http = HttpTaxonomyService::new(config).context("failed to build taxonomy client")?;
    tracing::debug!(base_url = http.base_url(), "taxonomy client ready");
    Ok(match config.cache_ttl() {
        Some(ttl) => Arc::new(CachedTaxonomyService::new(http, config.cache_capacity, ttl)),
        None => Arc::new(http),
    })
}

fn node_id(args: &ArgMatches, name: &str) -> Result<NodeId> {
    args.get_one::<String>(name)
        .map(|id| NodeId::new(id.as_str()))
        .with_context(|| format!("missing --{name}"))
}

fn text(args: &ArgMatches, name: &str) -> Result<String> {
    args.get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing --{name}"))
}

fn rank(args: &ArgMatches) -> Result<TaxonomicRank> {
    args.get_one::<TaxonomicRank>("rank")
        .copied()
        .context("missing --rank")
}

async fn run(command: &str, args: &ArgMatches, service: Arc<dyn TaxonomyService>, format: Format) -> Result<String> {
    match command {
        "list" => {
            let rank = rank(args)?;
            let nodes = service
                .list_by_rank(rank)
                .await
                .with_context(|| format!("failed to list rank {rank}"))?;
            format.render(&nodes, |nodes| output::nodes(nodes))
        }
        "children" => {
            let parent = node_id(args, "parent")?;
            let nodes = service
                .list_by_parent(&parent)
                .await
                .with_context(|| format!("failed to list children of {parent}"))?;
            format.render(&nodes, |nodes| output::nodes(nodes))
        }
        "show" => {
            let id = node_id(args, "id")?;
            let node = service.get(&id).await.with_context(|| format!("failed to fetch {id}"))?;
            format.render(&node, output::node)
        }
        "create" => {
            let rank = rank(args)?;
            let parent = args.get_one::<String>("parent").map(|id| NodeId::new(id.as_str()));
            let request = NewTaxon::new(text(args, "name")?.trim(), rank, parent);
            let node = service
                .create(request)
                .await
                .with_context(|| format!("failed to create {rank} node"))?;
            format.render(&node, output::node)
        }
        "rename" => {
            let id = node_id(args, "id")?;
            let name = text(args, "name")?;
            let node = service
                .rename(&id, name.trim())
                .await
                .with_context(|| format!("failed to rename {id}"))?;
            format.render(&node, output::node)
        }
        "delete" => {
            let id = node_id(args, "id")?;
            service.delete(&id).await.with_context(|| format!("failed to delete {id}"))?;
            format.render(&serde_json::json!({ "deleted": id }), |_| format!("deleted {id}"))
        }
        "lineage" => {
            let id = node_id(args, "id")?;
            let ancestry = resolve_ancestry(service.as_ref(), &id)
                .await
                .with_context(|| format!("failed to resolve ancestry of {id}"))?;
            let selector = ChainSelector::mount(Arc::clone(&service), Some(ancestry.as_slice())).await;
            let snapshot = selector.snapshot();
            selector.close();
            format.render(&snapshot, output::snapshot)
        }
        other => anyhow::bail!("unknown command: {other}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let format = if matches.get_flag("json") {
        Format::Json
    } else {
        Format::Text
    };
    let Some((command, args)) = matches.subcommand() else {
        return Ok(());
    };

    let rendered = if command == "ranks" {
        format.render(TaxonomicRank::ALL.as_slice(), output::ranks)?
    } else {
        let config = load_config(&matches)?;
        let service = connect(&config)?;
        run(command, args, service, format).await?
    };
    println!("{rendered}");
    Ok(())
}
