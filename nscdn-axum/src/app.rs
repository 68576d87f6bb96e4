use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{gateway, GatewayState};

/// The gateway as a servable application
#[derive(Clone)]
pub struct GatewayApp {
    pub state: GatewayState,
    pub router: Router<()>,
}

impl GatewayApp {
    pub fn new(state: GatewayState) -> Self {
        Self {
            router: router(state.clone()),
            state,
        }
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "nscdn gateway listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// Every method on every path goes to the one gateway handler.
pub fn router(state: GatewayState) -> Router<()> {
    Router::new()
        .fallback(gateway::handle)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
