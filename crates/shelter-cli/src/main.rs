use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use shelter_core::app::{AgentBuilder, AgentConfig};
use shelter_core::domain::{FetchOutcome, Method, Request, ResponseSource};
use shelter_core::impls::{ClientRegistry, HttpNetwork, InMemoryCacheStorage, SwitchableNetwork};

/// オフラインキャッシュ agent を実オリジンに対して 1 回動かす
#[derive(Debug, Parser)]
#[command(name = "shelter", version, about)]
struct Cli {
    /// agent 設定（JSON）。省略時はデフォルト設定
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// fetch 先のオリジン（設定ファイルの origin より優先）
    #[arg(long, env = "SHELTER_ORIGIN")]
    origin: Option<String>,

    /// キャッシュのバージョン名（設定ファイルの version より優先）
    #[arg(long, env = "SHELTER_CACHE_VERSION")]
    cache_version: Option<String>,

    /// リクエストのメソッド
    #[arg(long, default_value = "GET")]
    method: String,

    /// リクエストに付けるヘッダ（`Name: value`、複数指定可）
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// オンラインで fetch した後、ネットワークを切って同じパスをもう一度 fetch する
    #[arg(long)]
    offline: bool,

    /// fetch するパス
    paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FetchLine<'a> {
    phase: &'a str,
    request: String,
    outcome: &'static str,
    source: Option<ResponseSource>,
    status: Option<u16>,
    bytes: Option<usize>,
}

impl<'a> FetchLine<'a> {
    fn new(phase: &'a str, request: &Request, outcome: &FetchOutcome) -> Self {
        Self {
            phase,
            request: request.to_string(),
            outcome: outcome.label(),
            source: outcome.source(),
            status: outcome.response().map(|r| r.status),
            bytes: outcome.response().map(|r| r.len()),
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // (A) 設定を読み込み、CLI の指定で上書き
    let mut config = match &cli.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };
    if let Some(version) = cli.cache_version {
        config.version = version;
    }
    if let Some(origin) = cli.origin {
        config.origin = Some(origin);
    }
    let origin = config
        .origin
        .clone()
        .context("no origin given: pass --origin, set SHELTER_ORIGIN, or add \"origin\" to the config")?;

    // (B) agent を組み立てる
    let network = Arc::new(SwitchableNetwork::new(HttpNetwork::new(&origin)?));
    let storage = Arc::new(InMemoryCacheStorage::new());
    let clients = Arc::new(ClientRegistry::new());
    clients.open_client().await;

    let agent = AgentBuilder::from_config(&config)?
        .network(network.clone())
        .storage(storage)
        .clients(clients)
        .build()?;
    tracing::info!(agent = %agent.id(), version = %agent.version(), %origin, "agent built");

    // (C) install → activate
    let installed = agent.install().await.context("install failed")?;
    println!("{}", serde_json::to_string(&installed)?);
    let activated = agent.activate().await.context("activate failed")?;
    println!("{}", serde_json::to_string(&activated)?);

    // (D) オンラインで fetch
    let method = Method::parse(&cli.method);
    let requests: Vec<Request> = cli
        .paths
        .iter()
        .map(|p| {
            cli.headers
                .iter()
                .fold(Request::new(method.clone(), p.as_str()), |req, (name, value)| {
                    req.with_header(name.as_str(), value.as_str())
                })
        })
        .collect();

    for request in &requests {
        let outcome = agent.handle_fetch(request).await;
        println!("{}", serde_json::to_string(&FetchLine::new("online", request, &outcome))?);
    }
    agent.settle().await;

    // (E) ネットワークを切ってもう一度
    if cli.offline {
        network.go_offline();
        for request in &requests {
            let outcome = agent.handle_fetch(request).await;
            println!("{}", serde_json::to_string(&FetchLine::new("offline", request, &outcome))?);
        }
    }

    println!("{}", serde_json::to_string_pretty(&agent.status().await)?);
    Ok(())
}
