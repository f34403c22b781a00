//! Map container component.

use dioxus::prelude::*;

/// Props for MapContainer
#[derive(Props, Clone, PartialEq)]
pub struct MapContainerProps {
    /// The DOM id deck.gl renders into
    pub id: String,
    /// Height of the map in pixels
    #[props(default = 600)]
    pub height: u32,
    children: Element,
}

/// A positioned div for the deck.gl canvas, with room for overlays.
#[component]
pub fn MapContainer(props: MapContainerProps) -> Element {
    let style = format!(
        "height: {}px; position: relative; width: 100%; overflow: hidden;",
        props.height
    );

    rsx! {
        div {
            style: "{style}",
            div {
                id: "{props.id}",
                style: "position: absolute; inset: 0;",
            }
            {props.children}
        }
    }
}
