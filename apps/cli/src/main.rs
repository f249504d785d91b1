use clap::Parser;
use quotewall_aggregator::{QuoteRequest, DEFAULT_PAGE_SIZE};
use quotewall_cli::{build_aggregator, config::Config, init_tracing};

/// Fetch N unique quotes from favqs.com, paginated
#[derive(Parser)]
#[command(name = "quotewall")]
#[command(version, about, long_about = None)]
struct Args {
    /// Total number of unique quotes to aggregate
    #[arg(long)]
    count: u32,

    /// Page to print (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Quotes per page, at most 50
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Only quotes carrying this tag
    #[arg(long)]
    tag: Option<String>,

    /// Walk every page and print the combined list
    #[arg(long, conflicts_with = "page")]
    all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;
    init_tracing(&config);
    let aggregator = build_aggregator(&config);

    let output = if args.all {
        let quotes = aggregator
            .collect_all(args.count, args.page_size, args.tag.as_deref())
            .await?;
        serde_json::to_string_pretty(&quotes)?
    } else {
        let mut request = QuoteRequest::new(args.count)
            .page(args.page)
            .page_size(args.page_size);
        if let Some(tag) = args.tag {
            request = request.tag(tag);
        }
        let envelope = aggregator.get_quotes(request).await?;
        serde_json::to_string_pretty(&envelope)?
    };

    println!("{output}");
    Ok(())
}
