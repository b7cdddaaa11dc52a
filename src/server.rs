use axum::{Extension, Router, routing::get};
use reqwest::Url;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot, watch},
};

use crate::{
    api::{self, CallbackState},
    error::{AuthError, Result},
};

/// Short-lived local HTTP listener bound to the redirect URI.
///
/// Listens on every address the redirect host resolves to, so `localhost`
/// answers on both `127.0.0.1` and `::1`. Captures the query string of the
/// first request on the redirect path and shuts down once it has one or the
/// wait times out.
pub struct CallbackServer {
    local_addrs: Vec<SocketAddr>,
    redirect_base: String,
    captured: oneshot::Receiver<String>,
    shutdown: watch::Sender<bool>,
}

impl CallbackServer {
    /// Binds to the host and port of `redirect_uri` and serves its path.
    pub async fn bind(redirect_uri: &str) -> Result<Self> {
        let mut url = Url::parse(redirect_uri).map_err(|e| {
            AuthError::CallbackServer(format!("invalid redirect URI {}: {}", redirect_uri, e))
        })?;

        let host = url
            .host_str()
            .ok_or_else(|| AuthError::CallbackServer("redirect URI has no host".into()))?
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| AuthError::CallbackServer("redirect URI has no port".into()))?;
        let path = url.path().to_string();

        let (tx, captured) = oneshot::channel();
        let state: CallbackState = Arc::new(Mutex::new(Some(tx)));

        let app = Router::new().route(&path, get(api::callback).layer(Extension(state)));

        let listeners = bind_all(&host, port).await?;
        let local_addrs = listeners
            .iter()
            .map(TcpListener::local_addr)
            .collect::<std::io::Result<Vec<_>>>()?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        for listener in listeners {
            let app = app.clone();
            let mut shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                let _ = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.changed().await;
                    })
                    .await;
            });
        }

        url.set_query(None);
        url.set_fragment(None);

        Ok(CallbackServer {
            local_addrs,
            redirect_base: url.to_string(),
            captured,
            shutdown,
        })
    }

    /// First bound address, the one reported to the user.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addrs[0]
    }

    pub fn local_addrs(&self) -> &[SocketAddr] {
        &self.local_addrs
    }

    /// Waits for the redirect and returns it as a full URL.
    ///
    /// The URL is the configured redirect URI with the captured query string
    /// appended, ready for [`crate::spotify::auth::extract_code`].
    pub async fn wait(self, timeout: Duration) -> Result<String> {
        let outcome = tokio::time::timeout(timeout, self.captured).await;
        let _ = self.shutdown.send(true);

        match outcome {
            Ok(Ok(query)) => Ok(format!("{}?{}", self.redirect_base, query)),
            Ok(Err(_)) => Err(AuthError::CallbackServer(
                "server stopped before a callback arrived".into(),
            )),
            Err(_) => Err(AuthError::CallbackTimeout(timeout.as_secs())),
        }
    }
}

/// Binds every address `host` resolves to on `port`.
///
/// Only the first address must bind; the others are best effort, since a host
/// without IPv6 still resolves `localhost` to `::1`. With port 0 the remaining
/// listeners reuse the port picked for the first one.
async fn bind_all(host: &str, port: u16) -> Result<Vec<TcpListener>> {
    let mut addrs: Vec<SocketAddr> = Vec::new();
    let resolved = tokio::net::lookup_host(format!("{}:{}", host, port))
        .await
        .map_err(|e| AuthError::CallbackServer(format!("cannot resolve {}: {}", host, e)))?;
    for addr in resolved {
        if !addrs.contains(&addr) {
            addrs.push(addr);
        }
    }

    let Some((first, rest)) = addrs.split_first() else {
        return Err(AuthError::CallbackServer(format!(
            "{} did not resolve to any address",
            host
        )));
    };

    let listener = TcpListener::bind(*first).await.map_err(|e| {
        AuthError::CallbackServer(format!("cannot listen on {}: {}", first, e))
    })?;
    let bound_port = listener.local_addr()?.port();

    let mut listeners = vec![listener];
    for addr in rest {
        let mut addr = *addr;
        addr.set_port(bound_port);
        if let Ok(listener) = TcpListener::bind(addr).await {
            listeners.push(listener);
        }
    }

    Ok(listeners)
}
