use sea_orm_migration::prelude::*;

/// Migration CLI, e.g. `DATABASE_URL=postgres://... cargo run -p migration -- up`.
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
