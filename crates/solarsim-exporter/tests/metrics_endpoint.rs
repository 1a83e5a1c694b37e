//! HTTP surface: exposition body, content type, readiness.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use solarsim_core::{Anomaly, NoiseSource};
use solarsim_exporter::app_state::AppState;
use solarsim_exporter::config::SimulatorConfig;
use solarsim_exporter::ops::EXPOSITION_CONTENT_TYPE;
use solarsim_exporter::router::build_router;

struct Pinned(f64, Option<Anomaly>);

impl NoiseSource for Pinned {
    fn atmospheric_factor(&mut self) -> f64 {
        self.0
    }
    fn anomaly(&mut self, _probability: f64) -> Option<Anomaly> {
        self.1
    }
}

async fn get(state: &AppState, path: &str) -> (StatusCode, Option<String>, String) {
    let resp = build_router(state.clone())
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let ctype = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, ctype, String::from_utf8(bytes.to_vec()).unwrap())
}

/// `metric -> farm -> value` for lines labelled only by `farm`.
fn parse_farm_gauges(body: &str) -> HashMap<String, HashMap<String, f64>> {
    let mut out: HashMap<String, HashMap<String, f64>> = HashMap::new();
    for line in body.lines().filter(|l| !l.starts_with('#')) {
        let (series, value) = line.rsplit_once(' ').expect("sample line has a value");
        let value: f64 = value.parse().expect("value parses as float");
        let Some((name, rest)) = series.split_once("{farm=\"") else { continue };
        let Some(farm) = rest.strip_suffix("\"}").filter(|f| !f.contains('"')) else {
            continue;
        };
        out.entry(name.to_string()).or_default().insert(farm.to_string(), value);
    }
    out
}

#[tokio::test]
async fn metrics_exposes_four_gauges_per_farm() {
    let state = AppState::new(SimulatorConfig::default());
    state.generator_with(Box::new(Pinned(1.0, None))).tick_at(12.0);

    let (status, ctype, body) = get(&state, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctype.as_deref(), Some(EXPOSITION_CONTENT_TYPE));

    let gauges = parse_farm_gauges(&body);
    for name in [
        "solar_power_watts",
        "solar_irradiance_wm2",
        "solar_panel_temperature_celsius",
        "solar_inverter_status",
    ] {
        assert!(body.contains(&format!("# TYPE {name} gauge\n")), "{name}");
        assert_eq!(body.matches(&format!("# TYPE {name} ")).count(), 1, "{name}");
        let farms = &gauges[name];
        assert_eq!(farms.len(), 3, "{name}");
        for id in ["provence", "occitanie", "aquitaine"] {
            assert!(farms.contains_key(id), "{name} {id}");
        }
    }

    assert_eq!(gauges["solar_irradiance_wm2"]["provence"], 1000.0);
    assert_eq!(gauges["solar_panel_temperature_celsius"]["occitanie"], 45.0);
    assert_eq!(gauges["solar_inverter_status"]["aquitaine"], 1.0);
    let power = gauges["solar_power_watts"]["provence"];
    assert!((power - 1_581_000.0).abs() < 0.01, "{power}");

    assert!(body.contains(concat!(
        r#"solar_farm_info{farm="provence",latitude="43.29","#,
        r#"name="Marseille",panels="5000",peak_power_kw="0.4"} 1"#
    )));
    assert!(body.contains("solar_simulator_ticks_total 1\n"));
}

#[tokio::test]
async fn scrapes_without_tick_are_identical() {
    let state = AppState::new(SimulatorConfig::default());
    let mut generator = state.generator_with(Box::new(solarsim_core::RngNoise::seeded(3)));
    generator.tick_at(10.0);

    let (_, _, first) = get(&state, "/metrics").await;
    let (_, _, second) = get(&state, "/metrics").await;
    assert_eq!(first, second);

    generator.tick_at(14.0);
    let (_, _, third) = get(&state, "/metrics").await;
    assert_ne!(first, third);
}

#[tokio::test]
async fn inverter_failure_is_published_and_counted() {
    let state = AppState::new(SimulatorConfig::default());
    state
        .generator_with(Box::new(Pinned(1.0, Some(Anomaly::InverterFailure))))
        .tick_at(11.0);

    let (_, _, body) = get(&state, "/metrics").await;
    let gauges = parse_farm_gauges(&body);
    for id in ["provence", "occitanie", "aquitaine"] {
        assert_eq!(gauges["solar_power_watts"][id], 0.0);
        assert_eq!(gauges["solar_inverter_status"][id], 0.0);
    }
    assert!(body.contains("# TYPE solar_anomalies_total counter\n"));
    assert!(body.contains(r#"solar_anomalies_total{farm="provence",kind="inverter_failure"} 1"#));
}

#[tokio::test]
async fn readiness_flips_when_draining() {
    let state = AppState::new(SimulatorConfig::default());

    let (status, _, body) = get(&state, "/healthz").await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

    let (status, _, _) = get(&state, "/readyz").await;
    assert_eq!(status, StatusCode::OK);

    state.set_draining();
    let (status, _, body) = get(&state, "/readyz").await;
    assert_eq!((status, body.as_str()), (StatusCode::SERVICE_UNAVAILABLE, "draining"));
}
