use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clients::navigation::NavigationLinks;
use crate::models::route::{Route, RouteProgress, Stop};

// Request para reordenar las paradas restantes; sin `sequence` decide el optimizador
#[derive(Debug, Default, Deserialize)]
pub struct ResequenceRequest {
    #[serde(default)]
    pub sequence: Option<Vec<Uuid>>,
}

// Response de ruta con su progreso
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub route: Route,
    pub progress: RouteProgress,
    pub current_stop: Option<Stop>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            progress: route.progress(),
            current_stop: route.current_stop().cloned(),
            route,
        }
    }
}

// Response de navegación
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub route_id: Uuid,
    #[serde(flatten)]
    pub links: NavigationLinks,
}
