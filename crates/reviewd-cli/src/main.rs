use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "reviewd-cli")]
#[command(about = "reviewd operational tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Populate the database with demo users, products, posts and reviews.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = reviewd_core::load_app_config()?;
    let pool_config = reviewd_db::PoolConfig::from_app_config(&config);
    let pool = reviewd_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Migrate => {
            reviewd_db::run_migrations(&pool).await?;
            tracing::info!("migrations applied");
        }
        Commands::Seed => {
            reviewd_db::run_migrations(&pool).await?;
            let reviews = reviewd_db::seed::seed_demo_data(&pool).await?;
            tracing::info!(reviews, "demo data seeded");
        }
    }

    Ok(())
}
