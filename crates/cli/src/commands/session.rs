//! Admin session commands.
//!
//! The session is persisted, so one `login` covers later commands until it
//! expires or `logout` is run.

use super::{CliError, open_admin};

#[allow(clippy::print_stdout)]
pub async fn login(username: &str, password: &str) -> Result<(), CliError> {
    let admin = open_admin().await?;
    admin.login(username, password).await?;

    let hours = admin.auth().session_ttl().num_hours();
    println!("Logged in for {hours} hours");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn logout() -> Result<(), CliError> {
    let admin = open_admin().await?;
    admin.logout().await?;
    println!("Logged out");
    Ok(())
}
