use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use chrono::Local;
use reqwest::{Client, Url};
use tabled::Table;

use crate::{
    config::Config,
    error,
    error::{AuthError, Result},
    info,
    server::CallbackServer,
    success,
    types::{TokenPair, TokenResponse},
    utils, warning,
};

/// How the redirect back from Spotify is captured and what the user sees.
#[derive(Debug, Clone, Default)]
pub struct AuthOptions {
    /// Capture the redirect with a local listener instead of asking for a paste.
    pub listen: bool,
    /// Skip launching the browser and only print the URL.
    pub no_browser: bool,
    /// Ask Spotify to show the consent dialog even if already approved.
    pub show_dialog: bool,
    /// Overrides `Config::callback_timeout` for listen mode.
    pub callback_timeout: Option<Duration>,
}

/// Runs the authorization code flow and prints the resulting tokens.
///
/// On any failure the error is printed and the process exits with status 1.
///
/// # Flow
///
/// 1. **Authorization URL**: built from the configured client id, redirect URI and scope
/// 2. **Browser Launch**: the URL is opened in the default browser (or printed)
/// 3. **Redirect Capture**: the redirect URL is pasted by the user, or caught
///    by a local callback listener in `listen` mode
/// 4. **Code Extraction**: the `code` query parameter is taken from the redirect
/// 5. **Token Exchange**: code and client credentials are posted to the token endpoint
pub async fn auth(config: Config, options: AuthOptions) {
    match authorize(&config, &options).await {
        Ok(tokens) => print_tokens(&tokens),
        Err(e) => error!("{}", e),
    }
}

/// Same as [`auth`] but hands the token pair back instead of printing it.
pub async fn authorize(config: &Config, options: &AuthOptions) -> Result<TokenPair> {
    authorize_with(config, options, io::BufReader::new(io::stdin()), io::stdout()).await
}

/// Runs the flow, reading a pasted redirect URL from `input` in paste mode.
///
/// The code is only sent to the token endpoint once it has been extracted;
/// a redirect without one ends the run before any request is made.
pub async fn authorize_with<R, W>(
    config: &Config,
    options: &AuthOptions,
    input: R,
    output: W,
) -> Result<TokenPair>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let auth_url = authorization_url(config, options.show_dialog)?;

    let redirect_url = if options.listen {
        let server = CallbackServer::bind(&config.redirect_uri).await?;
        info!(
            "Listening for the authorization callback on {}",
            server.local_addr()
        );
        launch_authorization(&auth_url, options.no_browser);

        let timeout = options.callback_timeout.unwrap_or(config.callback_timeout);
        let pb = utils::spinner("Waiting for authorization in the browser...");
        let captured = server.wait(timeout).await;
        pb.finish_and_clear();
        captured?
    } else {
        launch_authorization(&auth_url, options.no_browser);
        tokio::task::spawn_blocking(move || prompt_redirect_url(input, output))
            .await
            .map_err(|e| AuthError::Io(io::Error::other(e)))??
    };

    let code = extract_code(&redirect_url)?;

    let client = http_client(config)?;
    let pb = utils::spinner("Exchanging authorization code for tokens...");
    let tokens = exchange_code(&client, config, &code).await;
    pb.finish_and_clear();
    tokens
}

/// Builds the Spotify authorize URL for the configured client.
///
/// Query parameters are form-encoded in the order `response_type`,
/// `client_id`, `redirect_uri`, `scope`, followed by `show_dialog` when
/// requested. The scope is whitespace-normalized. The result only depends on
/// its inputs.
pub fn authorization_url(config: &Config, show_dialog: bool) -> Result<String> {
    let mut url = Url::parse(&config.auth_url).map_err(|e| AuthError::InvalidConfig {
        key: crate::config::AUTH_URL_KEY,
        reason: e.to_string(),
    })?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", "code")
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("scope", &crate::config::normalize_scope(&config.scope));
        if show_dialog {
            query.append_pair("show_dialog", "true");
        }
    }

    Ok(url.to_string())
}

/// Opens the authorization URL in the default browser.
///
/// A failed launch is not fatal: the URL is printed so it can be opened by hand.
pub fn launch_authorization(auth_url: &str, no_browser: bool) {
    if no_browser {
        info!("Open the following URL in your browser:\n{}", auth_url);
        return;
    }

    if webbrowser::open(auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }
}

/// Asks for the URL the browser was redirected to and reads one line.
pub fn prompt_redirect_url<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<String> {
    writeln!(
        output,
        "Please authorize the application in the browser and copy the URL you are redirected to."
    )?;
    write!(output, "Paste the redirected URL here: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let line = line.trim();
    if line.is_empty() {
        return Err(AuthError::EmptyInput);
    }
    Ok(line.to_string())
}

/// Pulls the authorization code out of a redirect URL.
///
/// # Errors
///
/// - [`AuthError::InvalidRedirectUrl`] when the text is not an absolute URL
/// - [`AuthError::AuthorizationDenied`] when Spotify redirected with `error`
/// - [`AuthError::MissingAuthorizationCode`] when there is no non-empty `code`
/// - [`AuthError::AmbiguousAuthorizationCode`] when `code` appears more than once
pub fn extract_code(redirect_url: &str) -> Result<String> {
    let url = Url::parse(redirect_url.trim())
        .map_err(|e| AuthError::InvalidRedirectUrl(format!("{}: {}", redirect_url.trim(), e)))?;

    let mut codes = Vec::new();
    let mut denied = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => codes.push(value.into_owned()),
            "error" => denied = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(reason) = denied {
        return Err(AuthError::AuthorizationDenied(reason));
    }

    match codes.as_slice() {
        [] => Err(AuthError::MissingAuthorizationCode),
        [code] if code.is_empty() => Err(AuthError::MissingAuthorizationCode),
        [code] => Ok(code.clone()),
        _ => Err(AuthError::AmbiguousAuthorizationCode),
    }
}

/// HTTP client used for the token exchange, bounded by the configured timeout.
pub fn http_client(config: &Config) -> Result<Client> {
    Ok(Client::builder().timeout(config.http_timeout).build()?)
}

/// Exchanges an authorization code for an access and refresh token.
///
/// Exactly one request is sent; there is no retry.
pub async fn exchange_code(client: &Client, config: &Config, code: &str) -> Result<TokenPair> {
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &config.redirect_uri),
            ("client_id", &config.client_id),
            ("client_secret", &config.client_secret),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    parse_token_response(status.as_u16(), &body)
}

/// Interprets a token endpoint body.
///
/// The body decides the outcome, not the status: Spotify answers `400` with an
/// `error` object, which is reported as [`AuthError::TokenExchange`].
pub fn parse_token_response(status: u16, body: &str) -> Result<TokenPair> {
    let json: TokenResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::MalformedTokenResponse(format!("HTTP {}: {}", status, e)))?;

    if let Some(error) = json.error {
        return Err(AuthError::TokenExchange {
            error,
            description: json.error_description,
        });
    }

    match (json.access_token, json.refresh_token) {
        (Some(access_token), Some(refresh_token)) => Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: json.token_type,
            scope: json.scope,
            expires_in: json.expires_in,
        }),
        _ => Err(AuthError::MalformedTokenResponse(format!(
            "HTTP {}: missing access_token or refresh_token",
            status
        ))),
    }
}

fn print_tokens(tokens: &TokenPair) {
    success!("Authentication successful!");
    println!();
    info!("Access Token: {}", tokens.access_token);
    println!();
    info!("Refresh Token: {}", tokens.refresh_token);
    println!();

    let rows = utils::token_table_rows(tokens, Local::now());
    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
}
