use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::{AppContext, UiState};
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();

    // Root signals. Dark mode starts from the persisted preference; the
    // revision counter drives view-model refreshes after mutations.
    let dark_mode = use_signal(|| ctx.services().prefs.dark_mode());
    let revision = use_signal(|| 0_u64);
    use_context_provider(|| UiState {
        dark_mode,
        revision,
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title. Per-route titles render inside the page.
        document::Title { "DSCode" }

        div { class: if dark_mode() { "app-root app-root--dark" } else { "app-root" },
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
