//! Log in, browse a paginated resource, log out
//!
//! This example demonstrates:
//! - Loading resource endpoints from YAML
//! - Logging in through `AuthSession` and watching the auth store
//! - Paginated and sorted queries on a configured resource
//! - Custom methods declared on top of the built-in CRUD ones
//!
//! Run it against a backend listening on `localhost:8080`:
//!
//! ```text
//! RUST_LOG=rest_resource=debug cargo run --example auth_flow
//! ```

use futures::StreamExt;
use rest_resource::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚀 rest-resource auth flow");
    println!("==========================\n");

    let path = std::env::var("CLIENT_CONFIG")
        .unwrap_or_else(|_| "demos/auth_flow/client.yaml".to_string());
    let config = ClientConfig::from_yaml_file(&path)?;
    println!("✅ Loaded {} resource(s) from {}", config.resources.len(), path);

    let users_config = config
        .find("users")
        .ok_or_else(|| anyhow::anyhow!("no 'users' resource in {}", path))?;
    let server = users_config
        .base_url
        .split("/api/")
        .next()
        .unwrap_or_default()
        .to_string();

    let factory = ResourceFactory::from_config(&config)?.declare(
        "users",
        config.resource("users")?.method(
            MethodDescriptor::get("roles")
                .path("/{id}/roles")
                .param(ParamBinding::path("id")),
        ),
    )?;

    // Watch authentication changes in the background
    let store = AppState::store();
    let mut auth_changes = Box::pin(store.select(select_auth));
    tokio::spawn(async move {
        while let Some(auth) = auth_changes.next().await {
            println!("🔔 authenticated = {}", auth.authenticated);
        }
    });

    let session = AuthSession::new(
        format!("{}{}", server, config.auth_path),
        factory.http(),
        store,
    )?;

    let username = std::env::var("API_USER").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("API_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    match session
        .login(&json!({"username": username, "password": password}))
        .await
    {
        Ok(user) => println!("✅ Logged in as {}", user.unwrap_or_default()),
        Err(e) => {
            println!("❌ Login failed: {}", e);
            return Ok(());
        }
    }

    let users: Resource<User> = factory.resource("users")?;
    let request = PageRequest::new(0, 10).sorted_by(Order::asc("name"));
    if let Some(page) = users.find(Some(&request), None).await? {
        println!(
            "\n📄 Page {}/{} ({} users in total)",
            page.number + 1,
            page.total_pages,
            page.total_elements
        );
        for user in &page.content {
            let roles = users
                .invoke_as::<Vec<String>>("roles", args![user.id])
                .await?
                .unwrap_or_default();
            println!("   - #{} {} {:?}", user.id, user.name, roles);
        }
    }

    session.logout().await?;
    println!("\n👋 Logged out");

    Ok(())
}
