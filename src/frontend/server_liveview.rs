use axum::{extract::ws::WebSocketUpgrade, response::Html, routing::get, Router};
use dotenvy::dotenv;
use tracing::info;

use super::app::app;

pub async fn start_server() {
    dotenv().ok();
    let listen_addr =
        std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3030".to_string());
    let reachable_addr = std::env::var("REACHABLE_ADDR").unwrap_or_else(|_| listen_addr.clone());

    let addr: std::net::SocketAddr = listen_addr.parse().expect("LISTEN_ADDR must be host:port");

    let view = dioxus_liveview::LiveViewPool::new();

    let router = Router::new()
        .route(
            "/",
            get(move || async move {
                Html(format!(
                    r#"
            <!DOCTYPE html>
            <html>
                <head>
                    <title>Fund Advisor</title>
                    <meta name="viewport"
                    content="width=device-width,
                    initial-scale=1,
                    minimum-scale=1,
                    maximum-scale=1,
                    user-scalable=no">
                </head>
                <body> <div id="main"></div> </body>
                {glue}
            </html>
            "#,
                    glue = dioxus_liveview::interpreter_glue(&format!("ws://{reachable_addr}/ws"))
                ))
            }),
        )
        .route(
            "/ws",
            get(move |ws: WebSocketUpgrade| async move {
                ws.on_upgrade(move |socket| async move {
                    _ = view.launch(dioxus_liveview::axum_socket(socket), app).await;
                })
            }),
        );

    info!("listening on http://{addr}");

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await
        .unwrap();
}
