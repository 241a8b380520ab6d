use crate::cache;
use crate::cli::{CacheArgs, CacheSubcommand};
use crate::error::Result;

pub fn run(args: CacheArgs) -> Result<()> {
    let root = cache::cache_dir()?;

    match args.command {
        Some(CacheSubcommand::List) => {
            show_cache_stats(&root)?;
            println!();
            list_cached_packages(&root)
        }
        Some(CacheSubcommand::Clean { name: Some(name) }) => {
            cache::remove_cached_package(&root, &name)?;
            println!("Removed cached package: {name}");
            Ok(())
        }
        Some(CacheSubcommand::Clean { name: None }) => {
            cache::clear_cache(&root)?;
            println!("Cache cleared successfully.");
            Ok(())
        }
        None => {
            show_cache_stats(&root)?;
            Ok(())
        }
    }
}

fn show_cache_stats(root: &std::path::Path) -> Result<()> {
    let stats = cache::cache_stats(root)?;

    println!("Cache Statistics:");
    println!("  Location: {}", root.display());
    println!("  Packages: {}", stats.packages);
    println!("  Binaries: {}", stats.binaries);
    println!("  Size: {}", stats.formatted_size());

    if stats.packages == 0 {
        println!("\nCache is empty.");
    }

    Ok(())
}

fn list_cached_packages(root: &std::path::Path) -> Result<()> {
    let packages = cache::list_cached_packages(root)?;

    if packages.is_empty() {
        println!("No cached packages.");
        return Ok(());
    }

    println!("Cached packages ({}):", packages.len());
    for package in &packages {
        println!(
            "  {} ({}; {} binar{}, {})",
            package.name,
            package.versions.join(", "),
            package.binaries,
            if package.binaries == 1 { "y" } else { "ies" },
            package.formatted_size()
        );
    }

    Ok(())
}
