use dioxus::prelude::*;

use crate::plotter::PlotterWorkspace;

#[component]
pub fn Plotter() -> Element {
    rsx! {
        section { class: "page page-plotter",
            h1 { "Gradient Norm Plotter" }
            p {
                "Upload JSON training logs, shape the curves, and export the chart or your styling choices."
            }

            PlotterWorkspace {}
        }
    }
}
