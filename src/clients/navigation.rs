//! Enlaces de navegación
//!
//! Construye URLs de Google Maps para abrir la navegación paso a paso hacia
//! una dirección o a lo largo de una lista ordenada de direcciones.

use serde::Serialize;

use crate::models::route::{Route, StopStatus};
use crate::utils::errors::DeliveryError;

const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Enlaces de navegación de una ruta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationLinks {
    /// Paradas restantes en orden de visita; `None` si la ruta terminó
    pub route_url: Option<String>,
    pub current_stop_url: Option<String>,
}

/// URL hacia una única dirección
pub fn single_stop_url(address: &str) -> String {
    format!(
        "{}&destination={}&travelmode=driving",
        MAPS_DIRECTIONS_URL,
        urlencoding::encode(address)
    )
}

/// URL a lo largo de varias direcciones; la última es el destino
pub fn route_url(addresses: &[&str]) -> Result<String, DeliveryError> {
    let (destination, waypoints) = addresses.split_last().ok_or_else(|| {
        DeliveryError::EmptyInput("navigation needs at least one address".to_string())
    })?;

    if waypoints.is_empty() {
        return Ok(single_stop_url(destination));
    }

    let waypoints = waypoints
        .iter()
        .map(|a| urlencoding::encode(a).into_owned())
        .collect::<Vec<_>>()
        .join("%7C");

    Ok(format!(
        "{}&destination={}&waypoints={}&travelmode=driving",
        MAPS_DIRECTIONS_URL,
        urlencoding::encode(destination),
        waypoints
    ))
}

/// Enlaces para las paradas aún no completadas de una ruta
pub fn links_for_route(route: &Route) -> NavigationLinks {
    let remaining: Vec<&str> = route
        .stops()
        .iter()
        .filter(|s| s.status != StopStatus::Completed)
        .map(|s| s.address.as_str())
        .collect();

    NavigationLinks {
        route_url: route_url(&remaining).ok(),
        current_stop_url: route.current_stop().map(|s| single_stop_url(&s.address)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_address_is_percent_encoded() {
        let url = single_stop_url("Elizabetes iela 45, Riga");
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=Elizabetes%20iela%2045%2C%20Riga&travelmode=driving"
        );
    }

    #[test]
    fn multiple_addresses_become_waypoints() {
        let url = route_url(&["A 1", "B 2", "C 3"]).unwrap();
        assert!(url.contains("destination=C%203"));
        assert!(url.contains("waypoints=A%201%7CB%202"));
    }

    #[test]
    fn one_address_has_no_waypoints() {
        let url = route_url(&["Valdemāra iela 88"]).unwrap();
        assert!(!url.contains("waypoints"));
    }

    #[test]
    fn empty_address_list_is_rejected() {
        assert!(matches!(route_url(&[]), Err(DeliveryError::EmptyInput(_))));
    }
}
