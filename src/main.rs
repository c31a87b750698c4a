use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use news_indexer::config::{self, AppConfig};
use news_indexer::ingest;
use news_indexer::search::{self, ElasticClient, IndexService};

/// Index news article JSON into a search service and query it / 新闻索引工具
#[derive(Parser)]
#[command(name = "news-indexer")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Configuration file path / 配置文件路径
    #[arg(short, long, env = "NEWS_INDEXER_CONFIG")]
    config: Option<PathBuf>,

    /// Index name, overrides the configuration / 索引名称
    #[arg(short, long)]
    index: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory, zip archive or JSON file (default: archives in the data root)
    Index {
        /// Source path / 数据源路径
        path: Option<PathBuf>,
        /// Documents per bulk request / 每批文档数
        #[arg(long)]
        batch_size: Option<usize>,
        /// Stop after this many documents / 最大文档数
        #[arg(long)]
        max_docs: Option<usize>,
        /// Number of archives taken from the data root / 压缩包数量
        #[arg(long)]
        archives: Option<usize>,
        /// Delete and re-create the index first / 重建索引
        #[arg(long)]
        recreate: bool,
    },
    /// Run a query-string search / 搜索
    Search {
        /// Query-string expression / 查询表达式
        query: String,
        /// Number of hits / 返回结果数
        #[arg(short, long)]
        size: Option<usize>,
    },
    /// Check the index service is reachable / 检查连接
    Ping,
}

async fn run_index(
    config: &AppConfig,
    client: &ElasticClient,
    path: Option<PathBuf>,
    batch_size: usize,
    max_docs: usize,
    archives: usize,
    recreate: bool,
) -> anyhow::Result<()> {
    let index_name = &config.index.name;
    if recreate {
        client.delete_index(index_name).await?;
        tracing::info!("Deleted index {}", index_name);
    }
    search::ensure_index(client, index_name).await?;

    let paths = match path {
        Some(path) => vec![path],
        None => {
            let data_dir = config.get_data_dir();
            let found = ingest::archives_in(&data_dir, archives)?;
            tracing::info!("Indexing {} archives from {:?}", found.len(), data_dir);
            found
        }
    };

    let started = std::time::Instant::now();
    let docs = ingest::documents(paths, max_docs);
    let total = ingest::bulk_index(client, index_name, docs, batch_size).await?;
    tracing::info!("Indexed {} documents in {:.1}s", total, started.elapsed().as_secs_f64());
    println!("Indexed {} documents into {}", total, index_name);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_indexer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration / 加载配置
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let mut app_config = config::load_config(&config_path)?;
    if let Some(index) = cli.index {
        app_config.index.name = index;
    }

    // Fatal when unreachable / 无法连接时直接退出
    let client = ElasticClient::connect(&app_config.elasticsearch).await?;

    match cli.command {
        Commands::Index { path, batch_size, max_docs, archives, recreate } => {
            let batch_size = batch_size.unwrap_or(app_config.ingest.batch_size);
            let max_docs = max_docs.unwrap_or(app_config.ingest.max_docs);
            let archives = archives.unwrap_or(app_config.ingest.num_archives);
            run_index(&app_config, &client, path, batch_size, max_docs, archives, recreate).await?;
        }
        Commands::Search { query, size } => {
            let size = size.unwrap_or(app_config.search.default_size);
            let results = search::search_boolean(&client, &query, &app_config.index.name, size).await;
            search::display_search_results(results.as_ref(), &query);
        }
        Commands::Ping => {
            println!("{} is reachable", client.base_url());
        }
    }

    Ok(())
}
