//! Map rendering – tiled base map, own-location marker, risk-coloured
//! report markers with image popups.

use leptos::*;
use leptos_leaflet::leaflet::LatLng;
use leptos_leaflet::*;

use crate::components::image_overlay::ImageOverlay;
use crate::model::{Coordinate, FloodReport};

/// Fallback centre (London) used until the device location arrives.
const DEFAULT_CENTER: (f64, f64) = (51.505, -0.09);
const DEFAULT_ZOOM: f64 = 13.0;

#[component]
pub fn MapView(
    #[prop(into)] center: Signal<Option<Coordinate>>,
    #[prop(into)] reports: Signal<Vec<FloodReport>>,
) -> impl IntoView {
    // Full-size image overlay; `None` means closed.
    let (expanded, set_expanded) = create_signal::<Option<String>>(None);

    view! {
        <div class="map-container">
            <MapContainer
                style="height: 100%; width: 100%"
                center=Position::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1)
                zoom=DEFAULT_ZOOM
                set_view=true
            >
                <Recenter center=center/>
                <TileLayer
                    url="https://tile.openstreetmap.org/{z}/{x}/{y}.png"
                    attribution="&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                />

                {move || {
                    center
                        .get()
                        .map(|c| {
                            view! {
                                <Marker position=Position::new(c.latitude, c.longitude)>
                                    <Popup>"Your location"</Popup>
                                </Marker>
                            }
                        })
                }}

                // Keyed by report id so prepending a new submission never
                // re-creates existing markers.
                <For
                    each=move || reports.get()
                    key=|report| report.id
                    children=move |report: FloodReport| {
                        view! { <ReportMarker report=report set_expanded=set_expanded/> }
                    }
                />
            </MapContainer>

            <ImageOverlay image=expanded on_close=move |_| set_expanded.set(None)/>
        </div>
    }
}

/// One risk-coloured marker with its info popup.
#[component]
fn ReportMarker(report: FloodReport, set_expanded: WriteSignal<Option<String>>) -> impl IntoView {
    let risk = report.risk_level;
    let image_href = report.image_href();

    view! {
        <Marker
            position=Position::new(report.latitude, report.longitude)
            icon_class=risk.marker_class().to_string()
        >
            <Popup>
                <div class="report-popup">
                    <h3>{report.title().to_string()}</h3>
                    <p>
                        "Risk: "
                        <span
                            class="risk-badge"
                            style=format!("background-color: {}", risk.color())
                        >
                            {risk.label()}
                        </span>
                    </p>
                    <p>"Depth: " {report.flood_depth.to_string()}</p>
                    {image_href
                        .map(|href| {
                            let full = href.clone();
                            view! {
                                <img
                                    class="report-thumb"
                                    src=href
                                    alt="Flood"
                                    on:click=move |_| set_expanded.set(Some(full.clone()))
                                />
                            }
                        })}
                    <p class="report-time">{report.submitted_at()}</p>
                </div>
            </Popup>
        </Marker>
    }
}

/// Re-centres the map when the location value changes, keeping the current
/// zoom. Deliberately keyed to the centre signal only, so unrelated
/// re-renders never move the viewport.
#[component]
fn Recenter(#[prop(into)] center: Signal<Option<Coordinate>>) -> impl IntoView {
    create_effect(move |_| {
        let Some(coordinate) = center.get() else {
            return;
        };
        let Some(context) = use_context::<LeafletMapContext>() else {
            return;
        };
        if let Some(map) = context.map() {
            map.set_view(
                &LatLng::new(coordinate.latitude, coordinate.longitude),
                map.get_zoom(),
            );
        }
    });
    // Renders nothing; only the effect matters.
}
