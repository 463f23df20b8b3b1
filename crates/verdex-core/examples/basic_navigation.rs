//! Basic navigation example demonstrating Verdex's DOM exploration surface.
//!
//! Launches a headless Chromium, navigates to a page, and walks through
//! snapshot → resolve_container → inspect using the refs the snapshot hands
//! back.
//!
//! # Running
//!
//! ```sh
//! cargo run -p verdex-core --example basic_navigation
//! ```

use verdex_core::{RuntimeConfig, VerdexRuntime};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Launching runtime...");
    let runtime = VerdexRuntime::launch(RuntimeConfig::default(), vec![]).await?;

    println!("\nNavigating to example.com...");
    let nav = runtime.navigate("https://example.com").await?;
    println!(
        "Navigated: {} ({}ms, status {:?}, {} redirects)",
        nav.navigation.url, nav.navigation.load_time_ms, nav.navigation.status, nav.navigation.redirect_count
    );
    println!("{} elements on the page:\n{}", nav.element_count, nav.text);

    let first_ref = nav.text.lines().find_map(|line| {
        let start = line.find("[ref=")? + 5;
        let end = line[start..].find(']')? + start;
        Some(line[start..end].to_string())
    });

    if let Some(first_ref) = first_ref {
        println!("\nInspecting {first_ref}...");
        let inspected = runtime.inspect(&first_ref).await?;
        println!("{inspected:#?}");

        let container = runtime.resolve_container(&first_ref).await?;
        println!("\nAncestor chain: {} levels", container.ancestors.len());
    }

    println!("\nClosing runtime...");
    runtime.close().await;
    println!("Done!");

    Ok(())
}
