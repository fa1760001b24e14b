// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use strum::IntoEnumIterator;

use super::*;

#[test]
fn test_store_keys_and_endpoints() {
    assert_eq!(Tab::Telescope.form_key(), "telescopeForm");
    assert_eq!(Tab::Telescope.params_key(), "telescopeParams");
    assert_eq!(Tab::Uvmos.form_key(), "uvmosForm");
    assert_eq!(Tab::Uvmos.params_key(), "uvmosParams");
    assert_eq!(Tab::Grism.endpoint(), "grism");
    assert_eq!(Tab::Transit.params_store(), StoreKind::Durable);
    assert_eq!(Tab::Photometry.params_store(), StoreKind::Session);
}

#[test]
fn test_parse_tab_names() {
    assert_eq!(Tab::from_str("telescope").unwrap(), Tab::Telescope);
    assert_eq!(Tab::from_str("UVMOS").unwrap(), Tab::Uvmos);
    assert_eq!(Tab::from_str("Transit").unwrap(), Tab::Transit);
    assert!(Tab::from_str("spectroscopy").is_err());
    assert_eq!(
        TABS_COMMA_SEPARATED.as_str(),
        "telescope, background, source, photometry, uvmos, grism, transit"
    );
}

#[test]
fn test_graph_is_consistent() {
    for tab in Tab::iter() {
        for down in tab.downstream() {
            assert!(
                down.upstream().contains(&tab),
                "{tab} lists {down} downstream, but not vice versa"
            );
        }
    }
    assert_eq!(Edge::all().count(), 6 + 4 + 4);
    assert!(Tab::Telescope.upstream().is_empty());
    assert!(Tab::Transit.downstream().is_empty());
}

#[test]
fn test_compute_tabs() {
    let compute: Vec<Tab> = Tab::iter().filter(|t| t.is_compute()).collect();
    assert_eq!(compute, Tab::compute_tabs());
    for tab in Tab::compute_tabs() {
        assert_eq!(
            tab.upstream(),
            &[Tab::Telescope, Tab::Background, Tab::Source]
        );
    }
}
