//! Minimal Blaster application.
//!
//! Reads `blaster.toml` when present and `BLASTER__*` environment
//! overrides, then serves a few routes until Ctrl+C.
//!
//! ```text
//! cargo run -p blaster --example hello
//! curl http://127.0.0.1:8080/user/:42
//! curl -d 'name=ann' http://127.0.0.1:8080/login
//! ```

use std::error::Error;

use blaster::prelude::*;
use serde::Serialize;

#[derive(Serialize)]
struct User {
    id: u64,
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ConfigLoader::new()
        .with_development()
        .with_optional_file("blaster.toml")?
        .with_env_prefix("BLASTER")
        .load()?;
    init_logging(&config.logging.log_config())?;

    let mut server = blaster::from_config(&config);
    server.use_middleware([
        AccessLogMiddleware::new().build(),
        RequestIdMiddleware::new().build(),
    ]);

    server.get("/", |ctx| {
        Box::pin(async move {
            ctx.write_string(StatusCode::OK, "hello from blaster");
        })
    });

    let mut api = server.group("/user");
    api.get("/:id", |ctx| {
        Box::pin(async move {
            let id = match ctx.path_value("id").to_u64() {
                Ok(id) => id,
                Err(err) => return ctx.write_string(err.status_code(), err.to_string()),
            };
            let user = User { id, name: format!("user-{id}") };
            if let Err(err) = ctx.write_json(StatusCode::OK, &user) {
                tracing::error!(error = %err, "failed to write user");
            }
        })
    });

    server.post("/login", |ctx| {
        Box::pin(async move {
            let name = ctx.form_value_or_default("name", "guest").into_string();
            match name {
                Ok(name) => {
                    let cookie = SetCookie::new("session", name.clone()).http_only(true);
                    if let Err(err) = ctx.set_cookie(&cookie) {
                        tracing::warn!(error = %err, "could not set session cookie");
                    }
                    ctx.write_string(StatusCode::OK, format!("welcome {name}"));
                }
                Err(err) => ctx.write_string(err.status_code(), err.to_string()),
            }
        })
    });

    tracing::info!(addr = %server.config().http_addr(), tls = server.is_tls(), "starting");
    server.run().await?;
    Ok(())
}
