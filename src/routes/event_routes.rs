//! Stream de eventos del store vía Server-Sent Events
//!
//! Cada cliente conectado recibe su propio `broadcast::Receiver`. Un cliente
//! lento pierde eventos antiguos en lugar de bloquear al store.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;

use crate::models::events::StoreEvent;
use crate::state::AppState;

pub fn create_event_router() -> Router<AppState> {
    Router::new().route("/", get(stream_events))
}

async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    log::info!("📡 Nuevo suscriptor de eventos");
    let receiver = state.subscribe();

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match to_sse_event(&event) {
                    Some(sse) => return Some((Ok::<_, Infallible>(sse), receiver)),
                    None => continue,
                },
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("⚠️ Suscriptor atrasado, {} eventos descartados", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &StoreEvent) -> Option<Event> {
    match Event::default().event(event.name()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            log::error!("❌ Error serializando evento {}: {}", event.name(), e);
            None
        }
    }
}
