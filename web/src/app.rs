//! Application shell – owns the reports list and the current location.

use leptos::*;

use crate::api;
use crate::components::map_view::MapView;
use crate::components::report_form::ReportForm;
use crate::geo;
use crate::model::{Coordinate, FloodReport};

/// The root `<App/>` component.
///
/// The reports list and the device location live here; every child reads
/// them through signals, and the only mutation is the prepend performed when
/// a submission succeeds. The initial fetch and the location request are
/// independent and may resolve in either order.
#[component]
pub fn App() -> impl IntoView {
    let (location, set_location) = create_signal::<Option<Coordinate>>(None);
    let (reports, set_reports) = create_signal::<Vec<FloodReport>>(vec![]);

    geo::request_current_position(move |coordinate| set_location.set(Some(coordinate)));

    spawn_local(async move {
        match api::fetch_reports().await {
            Ok(list) => set_reports.set(list),
            // A failed fetch leaves the list empty; submissions still work.
            Err(err) => log::warn!("Could not fetch reports: {err}"),
        }
    });

    let on_submitted = Callback::new(move |report: FloodReport| {
        set_reports.update(|list| prepend(list, report));
    });

    view! {
        <div class="app-container">
            <header class="header">
                <h1>"SeeFlood"</h1>
            </header>

            <main class="main-content">
                <div class="map-wrapper">
                    <MapView center=location reports=reports/>
                </div>

                <aside class="sidebar">
                    <ReportForm location=location on_submitted=on_submitted/>
                </aside>
            </main>
        </div>
    }
}

/// Newest report first; existing entries keep their relative order.
pub(crate) fn prepend(list: &mut Vec<FloodReport>, report: FloodReport) {
    list.insert(0, report);
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FloodDepth, RiskLevel};
    use chrono::{TimeZone, Utc};

    fn report(id: u64) -> FloodReport {
        FloodReport {
            id,
            latitude: 51.5,
            longitude: -0.09,
            location_name: None,
            risk_level: RiskLevel::Yellow,
            flood_depth: FloodDepth::Label("ankle_deep".into()),
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn submission_is_prepended_exactly_once() {
        let mut list = vec![report(1), report(2)];
        prepend(&mut list, report(3));
        let ids: Vec<u64> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn prepend_into_empty_list() {
        let mut list = Vec::new();
        prepend(&mut list, report(7));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 7);
    }
}
