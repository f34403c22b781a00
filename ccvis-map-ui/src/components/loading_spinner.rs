//! Loading indicator overlaid on the map while CSVs are in flight.

use dioxus::prelude::*;

#[component]
pub fn LoadingSpinner(pending: usize) -> Element {
    rsx! {
        div {
            style: "position: absolute; top: 12px; right: 12px; z-index: 2; padding: 6px 10px; background: rgba(20,20,20,0.8); color: #fff; border-radius: 4px; font-size: 12px;",
            "Cargando datos ({pending})..."
        }
    }
}
