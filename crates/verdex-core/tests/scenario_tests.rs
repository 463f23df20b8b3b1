#![cfg(feature = "integration")]

//! End-to-end scenarios against a real headless Chromium, using `data:` URLs
//! so nothing here depends on network access.

mod common;

use common::launch;
use verdex_core::RoleConfig;

fn refs_near(text: &str, needle: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains(needle))
        .filter_map(|line| {
            let start = line.find("[ref=")? + 5;
            let end = line[start..].find(']')? + start;
            Some(line[start..end].to_string())
        })
        .collect()
}

/// Scenario 1: container/filter/role selector discovery across repeating cards.
#[tokio::test]
async fn container_filter_role_discovery() {
    let runtime = launch(vec![]).await;

    let html = "<html><body>\
        <div data-testid=\"product-card\"><h3>Widget A</h3><button>Add to Cart</button></div>\
        <div data-testid=\"product-card\"><h3>Widget B</h3><button>Add to Cart</button></div>\
        <div data-testid=\"product-card\"><h3>Widget C</h3><button>Add to Cart</button></div>\
        <div data-testid=\"product-card\"><h3>Widget D</h3><button>Add to Cart</button></div>\
        <div data-testid=\"product-card\"><h3>Widget E</h3><button>Add to Cart</button></div>\
        <div data-testid=\"product-card\"><h3>Widget F</h3><button>Add to Cart</button></div>\
        <button>Out of Stock</button>\
        </body></html>";
    let url = format!("data:text/html,{}", urlencoding_encode(html));

    let nav = runtime.navigate(&url).await.expect("navigate");
    let add_to_cart_refs = refs_near(&nav.text, "Add to Cart");
    let out_of_stock_refs = refs_near(&nav.text, "Out of Stock");
    assert_eq!(add_to_cart_refs.len(), 6);
    assert_eq!(out_of_stock_refs.len(), 1);

    let first = &add_to_cart_refs[0];
    let container = runtime.resolve_container(first).await.expect("resolve_container");
    let card_level = container
        .ancestors
        .iter()
        .find(|a| a.attributes.get("data-testid").map(String::as_str) == Some("product-card"))
        .expect("an ancestor tagged product-card");

    let pattern = runtime
        .inspect_pattern(first, card_level.level)
        .await
        .expect("inspect_pattern");
    assert_eq!(pattern.siblings.len(), 6);
    let texts: std::collections::HashSet<_> = pattern
        .siblings
        .iter()
        .flat_map(|s| s.texts.iter().cloned())
        .collect();
    assert!(texts.len() >= 6, "each card's name should be distinct");

    runtime.close().await;
}

/// Scenario 2: a same-document (SPA) route change invalidates the Bridge's
/// ref map without the host needing to recreate the isolated world.
#[tokio::test]
async fn spa_same_document_routing_restarts_refs() {
    let runtime = launch(vec![]).await;

    let html = "<button id=\"go\" onclick=\"history.pushState({}, '', '/next'); \
        document.body.innerHTML = '<button>After route change</button>';\">Go</button>";
    let url = format!("data:text/html,{}", urlencoding_encode(html));
    let nav = runtime.navigate(&url).await.expect("navigate");
    let go_ref = refs_near(&nav.text, "Go")
        .into_iter()
        .next()
        .expect("go button has a ref");
    assert_eq!(go_ref, "e1");

    runtime
        .click(&go_ref)
        .await
        .expect("clicking go should trigger the route change");

    let snapshot = runtime.snapshot().await.expect("snapshot after route change");
    assert!(snapshot.text.contains("After route change"));
    let new_refs = refs_near(&snapshot.text, "After route change");
    assert_eq!(new_refs.first().map(String::as_str), Some("e1"));

    let click_after = runtime.click("e1").await;
    assert!(click_after.is_ok(), "a fresh e1 from the new snapshot should be clickable");

    runtime.close().await;
}

/// Scenario 3: cross-document navigation resets the ref counter.
#[tokio::test]
async fn cross_document_navigation_resets_refs() {
    let runtime = launch(vec![]).await;

    let page_a = format!(
        "data:text/html,{}",
        urlencoding_encode("<button>First on A</button>")
    );
    let page_b = format!(
        "data:text/html,{}",
        urlencoding_encode("<button>First on B</button>")
    );

    let nav_a = runtime.navigate(&page_a).await.expect("navigate to A");
    assert!(nav_a.text.contains("[ref=e1]"));

    let nav_b = runtime.navigate(&page_b).await.expect("navigate to B");
    assert!(nav_b.text.contains("[ref=e1]"));
    assert!(nav_b.text.contains("First on B"));
    assert!(!nav_b.text.contains("First on A"));

    runtime.close().await;
}

/// Scenario 4: role isolation — each role keeps its own page and cookies.
#[tokio::test]
async fn role_isolation_keeps_separate_pages() {
    let runtime = launch(vec![
        RoleConfig {
            name: "admin".to_string(),
            auth_state_path: None,
            default_url: None,
        },
        RoleConfig {
            name: "customer".to_string(),
            auth_state_path: None,
            default_url: None,
        },
    ])
    .await;

    runtime.select_role("admin").await.expect("select admin");
    runtime
        .navigate("data:text/html,<h1>A</h1>")
        .await
        .expect("navigate admin");

    runtime.select_role("customer").await.expect("select customer");
    runtime
        .navigate("data:text/html,<h1>B</h1>")
        .await
        .expect("navigate customer");

    runtime.select_role("admin").await.expect("reselect admin");
    let snapshot = runtime.snapshot().await.expect("snapshot admin");
    assert!(snapshot.text.contains('A'));
    assert!(!snapshot.text.contains('B'));

    runtime.close().await;
}

/// Scenario 6: an element removed from the DOM becomes stale, and acting on
/// its old ref fails rather than silently succeeding or resurrecting it.
#[tokio::test]
async fn stale_ref_is_rejected_after_removal() {
    let runtime = launch(vec![]).await;

    let html = "<button id=\"doomed\">Doomed</button>\
        <button id=\"remover\" onclick=\"document.getElementById('doomed').remove()\">Remover</button>";
    let url = format!("data:text/html,{}", urlencoding_encode(html));
    let nav = runtime.navigate(&url).await.expect("navigate");
    let doomed_ref = refs_near(&nav.text, "Doomed")
        .into_iter()
        .next()
        .expect("doomed button has a ref");
    let remover_ref = refs_near(&nav.text, "Remover")
        .into_iter()
        .next()
        .expect("remover button has a ref");

    runtime
        .inspect(&doomed_ref)
        .await
        .expect("inspect before removal should succeed");

    runtime
        .click(&remover_ref)
        .await
        .expect("clicking remover should succeed and remove the doomed element");

    let result = runtime.click(&doomed_ref).await;
    assert!(
        result.is_err(),
        "clicking a ref whose element was removed must fail, not silently succeed"
    );

    let snapshot = runtime.snapshot().await.expect("snapshot after removal");
    assert!(!snapshot.text.contains("Doomed"));

    runtime.close().await;
}

/// Minimal percent-encoding sufficient for embedding literal HTML in a
/// `data:` URL inside tests, without pulling in a URL-encoding dependency.
fn urlencoding_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
