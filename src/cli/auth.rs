use crate::{config::Config, error, spotify, spotify::auth::AuthOptions};

pub async fn auth(config: Config, options: AuthOptions) {
    spotify::auth::auth(config, options).await;
}

/// Prints the bare authorization URL so it can be piped or copied.
pub fn url(config: &Config, show_dialog: bool) {
    match spotify::auth::authorization_url(config, show_dialog) {
        Ok(url) => println!("{}", url),
        Err(e) => error!("{}", e),
    }
}
