// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use serde_json::json;

use super::*;
use crate::{coordinator::SaveContext, tab::StoreKind};

#[test]
fn test_panel_names() {
    assert_eq!(
        ResultPanel::from_str("response-curve").unwrap(),
        ResultPanel::ResponseCurve
    );
    assert_eq!(
        ResultPanel::from_str("Light-Curve").unwrap(),
        ResultPanel::LightCurve
    );
    for panel in ResultPanel::iter() {
        assert_eq!(ResultPanel::from_str(&panel.to_string()).unwrap(), panel);
        assert!(panel.fields().iter().any(|f| f.required), "{panel}");
    }
    assert!(ResultPanel::from_str("histogram").is_err());
}

#[test]
fn test_missing_data_gives_placeholders() {
    let stores = Stores::in_memory();
    let coordinator = FormCoordinator::new();
    assert_eq!(
        ResultPanel::SourceWeights
            .resolve(&stores, &coordinator)
            .unwrap(),
        PanelState::Placeholder("Please submit a Photometry calculation first")
    );
    assert_eq!(
        ResultPanel::ResponseCurve
            .resolve(&stores, &coordinator)
            .unwrap(),
        PanelState::Placeholder("Please save Telescope or Source parameters first")
    );
}

#[test]
fn test_partial_response_gives_placeholder() {
    let mut stores = Stores::in_memory();
    stores
        .session
        .set("photometryParams", json!({"aperMask": [[1]]}))
        .unwrap();
    let coordinator = FormCoordinator::new();
    assert!(matches!(
        ResultPanel::AperMask.resolve(&stores, &coordinator).unwrap(),
        PanelState::Placeholder(_)
    ));
}

#[test]
fn test_photometry_panels_refresh_on_submissions() {
    let mut stores = Stores::in_memory();
    stores
        .session
        .set(
            "photometryParams",
            json!({"sourceWeights": [[0.5]], "aperMask": [[1]], "aperExtent": [0, 1, 0, 1]}),
        )
        .unwrap();
    let mut coordinator = FormCoordinator::new();
    coordinator.on_saved(Tab::Photometry, &SaveContext::default());
    coordinator.on_saved(Tab::Photometry, &SaveContext::default());

    assert_eq!(
        ResultPanel::AperMask.resolve(&stores, &coordinator).unwrap(),
        PanelState::Ready {
            data: json!({"aperMask": [[1]], "aperExtent": [0, 1, 0, 1]}),
            refresh_key: 2
        }
    );
}

#[test]
fn test_response_curve_includes_source_spectrum_when_saved() {
    let mut stores = Stores::in_memory();
    let mut coordinator = FormCoordinator::new();
    stores
        .session
        .set("telescopeParams", json!({"fullPassbandCurves": {"uv": {}}}))
        .unwrap();
    coordinator.on_saved(Tab::Telescope, &SaveContext::default());

    let PanelState::Ready { data, refresh_key } = ResultPanel::ResponseCurve
        .resolve(&stores, &coordinator)
        .unwrap()
    else {
        panic!("expected data");
    };
    assert_eq!(data, json!({"fullPassbandCurves": {"uv": {}}}));
    assert_eq!(refresh_key, 1);

    stores
        .session
        .set("sourceParams", json!({"wavelengths": [1000], "spectrum": [1e-16]}))
        .unwrap();
    coordinator.on_saved(Tab::Source, &SaveContext::default());
    let PanelState::Ready { data, refresh_key } = ResultPanel::ResponseCurve
        .resolve(&stores, &coordinator)
        .unwrap()
    else {
        panic!("expected data");
    };
    assert_eq!(data["spectrum"], json!([1e-16]));
    assert_eq!(refresh_key, 2);
}

#[test]
fn test_transit_panels_read_the_durable_store() {
    let mut stores = Stores::in_memory();
    let coordinator = FormCoordinator::new();
    stores
        .session
        .set("transitParams", json!({"light_curve": [1.0]}))
        .unwrap();
    assert!(matches!(
        ResultPanel::LightCurve
            .resolve(&stores, &coordinator)
            .unwrap(),
        PanelState::Placeholder("Please save Transit parameters first")
    ));

    stores
        .get_mut(StoreKind::Durable)
        .set("transitParams", json!({"light_curve": [1.0]}))
        .unwrap();
    assert!(matches!(
        ResultPanel::LightCurve
            .resolve(&stores, &coordinator)
            .unwrap(),
        PanelState::Ready { refresh_key: 0, .. }
    ));
}
