//! Minimal usage demo: point it at a settings file, create an instance,
//! start it, and print the instance list.
//!
//! ```sh
//! RUST_LOG=info cargo run --example manage -- manager.json
//! ```

use dedsrv_manager::{InstanceManager, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "manager.json".to_string());

    let mut manager = InstanceManager::from_settings_file(&settings_path)?;
    manager.init()?;

    let id = manager.create()?;
    println!("created instance {}", id);

    manager.start(&id)?;
    println!("started instance {}", id);

    for instance in manager.list_instances()? {
        println!(
            "{}  running={}  name={:?}  players={}",
            instance.id, instance.running, instance.display_name, instance.player_count
        );
    }

    manager.shutdown().await?;
    Ok(())
}
