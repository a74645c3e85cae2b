use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use user_store::{Config, User, UserStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn print_users(users: &[User]) {
    println!("All users:");
    for user in users {
        println!("{user}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        driver = %cfg.db.driver,
        host = %cfg.db.host,
        port = cfg.db.port,
        database = %cfg.db.name,
        user = %cfg.db.user,
        loglevel = %cfg.loglevel
    );

    let mut store = UserStore::from_config(&cfg.db).await?;
    println!("Successfully connected to database!");

    store.create_users_table().await?;

    store.add_user("i@blocklune.cc", "password123").await?;

    let user_id = store
        .add_user_returning_id("you@blocklune.cc", "password456")
        .await?;
    println!("New user ID: {user_id}");

    print_users(&store.list_users().await?);

    let user = store.find_user_by_email("i@blocklune.cc").await?;
    println!("User with email i@blocklune.cc: {user}");

    store
        .update_user_password("i@blocklune.cc", "password789")
        .await?;

    let user = store.find_user_by_email("i@blocklune.cc").await?;
    println!("User with email i@blocklune.cc: {user}");

    store.delete_user_by_email("you@blocklune.cc").await?;

    print_users(&store.list_users().await?);

    store.close().await?;
    Ok(())
}
