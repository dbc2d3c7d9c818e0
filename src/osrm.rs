//! OSRM HTTP adapter for turn-by-turn routes.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::DirectionsError;
use crate::geodesy::LatLng;
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::route::{Leg, Route};
use crate::traits::{Avoid, DirectionsProvider, DirectionsRequest};

/// Where and how to reach an OSRM route service.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Server root, without the `/route/v1` path.
    pub base_url: String,
    /// Routing profile the server was prepared with.
    pub profile: String,
    /// Whole-request timeout, covering connect and body.
    pub timeout_secs: u64,
}

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_PROFILE: &str = "car";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE` and
    /// `OSRM_TIMEOUT_SECS` where set. An unparsable timeout is ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("OSRM_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Ok(profile) = std::env::var("OSRM_PROFILE") {
            config = config.with_profile(profile);
        }
        if let Some(timeout_secs) = std::env::var("OSRM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config = config.with_timeout_secs(timeout_secs);
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn route_root(&self) -> String {
        format!(
            "{}/route/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

/// Blocking [`DirectionsProvider`] backed by an OSRM route service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    http: reqwest::blocking::Client,
}

impl OsrmClient {
    /// Builds the HTTP client. No request is made until
    /// [`DirectionsProvider::directions`] is called.
    pub fn new(config: OsrmConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Route service URL for `request`.
    pub fn route_url(&self, request: &DirectionsRequest) -> String {
        let coords = request
            .stops()
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.lng, p.lat))
            .collect::<Vec<_>>()
            .join(";");

        let mut url = format!(
            "{}/{}?overview=full&geometries=polyline&steps=false&alternatives={}",
            self.config.route_root(),
            coords,
            request.options.alternatives
        );

        if !request.options.avoid.is_empty() {
            let classes = request
                .options
                .avoid
                .iter()
                .map(|avoid| exclude_class(*avoid))
                .collect::<Vec<_>>()
                .join(",");
            url.push_str("&exclude=");
            url.push_str(&classes);
        }
        url
    }
}

impl DirectionsProvider for OsrmClient {
    fn directions(&self, request: &DirectionsRequest) -> Result<Route, DirectionsError> {
        let url = self.route_url(request);
        debug!(%url, "requesting OSRM route");

        // OSRM reports failures in the body with a 4xx status, so the body
        // is read before looking at the status.
        let body = self
            .http
            .get(url)
            .send()?
            .json::<OsrmRouteResponse>()?;

        into_route(body, &request.stops())
    }
}

fn exclude_class(avoid: Avoid) -> &'static str {
    match avoid {
        Avoid::Tolls => "toll",
        Avoid::Highways => "motorway",
        Avoid::Ferries => "ferry",
    }
}

fn into_route(response: OsrmRouteResponse, stops: &[LatLng]) -> Result<Route, DirectionsError> {
    if response.code != "Ok" {
        let message = response.message.unwrap_or_default();
        warn!(code = %response.code, %message, "OSRM returned an error");
        return Err(DirectionsError::Provider {
            code: response.code,
            message,
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;

    // prefer the snapped positions OSRM reports over the requested ones
    let waypoints: Vec<LatLng> = if response.waypoints.len() == stops.len() {
        response
            .waypoints
            .iter()
            .map(|w| LatLng::new(w.location[1], w.location[0]))
            .collect()
    } else {
        stops.to_vec()
    };

    let legs = route
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| Leg {
            start: waypoints.get(i).copied().unwrap_or_default(),
            end: waypoints.get(i + 1).copied().unwrap_or_default(),
            distance_m: leg.distance,
            duration_s: leg.duration,
        })
        .collect();

    let overview_path = match route.geometry {
        Some(geometry) => Polyline::decode(&geometry, DEFAULT_PRECISION)?,
        None => Polyline::new(waypoints),
    };

    Ok(Route::new(legs, overview_path))
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: Option<String>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    /// `[lng, lat]`
    location: [f64; 2],
}
