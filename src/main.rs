use lms_admin::app::AppBuilder;
use lms_admin::erx::ResultEX;
use lms_admin::web::{shutdown_signal, Web};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!("lms-admin failed: {}", err.description());
        // config and logging errors happen before the subscriber is up
        eprintln!("lms-admin failed: {}", err.description());
        std::process::exit(1);
    }
}

async fn run() -> ResultEX {
    let conf = lms_admin::conf::load_env()?;
    let _guards = lms_admin::log::logging_initialize(&conf.name, &conf.log).await?;

    info!("{} {} ({}) starting", conf.name, lms_admin::VERSION, lms_admin::COMMIT_BUILD);

    let admin = AppBuilder::new(conf).build()?;
    Web::from_admin(admin).serve(shutdown_signal()).await
}
