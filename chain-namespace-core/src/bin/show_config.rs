use anyhow::Context;
use chain_namespace_core::{create_namespaces, known_networks, CoordinatorOptions};

fn main() -> anyhow::Result<()> {
    chain_namespace_core::init();
    let options = CoordinatorOptions::load().context("Failed to load coordinator options")?;

    println!("Chain Namespace Core Configuration:\n");
    println!("  Network switching: {}", options.enable_network_switch);
    println!("  Unsupported chains allowed: {}", options.allow_unsupported_chain);
    println!("  WalletConnect basic: {}", options.wc_basic);
    match &options.storage_path {
        Some(path) => println!("  Storage: {}", path.display()),
        None => println!("  Storage: (in memory)"),
    }
    let names: Vec<&str> = options.names_supported_namespaces.iter().map(|ns| ns.as_str()).collect();
    println!("  Names supported on: {}", names.join(", "));

    let networks = known_networks();
    println!("\nKnown networks:");
    for network in &networks {
        println!(
            "  {:<48} {:<20} {}",
            network.caip_network_id,
            network.name,
            network.default_rpc_url().unwrap_or("(no rpc)")
        );
    }

    let namespaces = create_namespaces(&networks, None);
    println!(
        "\nSession namespaces:\n{}",
        serde_json::to_string_pretty(&namespaces).context("Failed to render session namespaces")?
    );
    Ok(())
}
