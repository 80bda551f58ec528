use anyhow::Result;

use shelf_core::session::AuthApi;

/// Exchanges credentials for a bearer token and prints it.
pub async fn run(client: &dyn AuthApi, username: &str, password: &str) -> Result<()> {
    let token = client.login(username, password).await?;
    println!("{token}");
    eprintln!("Export it for the other commands: SHELF_TOKEN={token}");
    Ok(())
}
