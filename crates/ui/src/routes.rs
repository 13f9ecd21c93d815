use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::{AppContext, UiState};
use crate::views::{BrowseView, ProblemView, SettingsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", BrowseView)] Browse {},
        #[route("/problem/:id", ProblemView)] Problem { id: String },
        #[route("/settings", SettingsView)] Settings {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    // Subscribe to the revision pulse so the badge tracks sign-in/out.
    let _ = (ui.revision)();
    let session = ctx.services().auth.current_session();
    let stats = ctx.services().progress.global_stats();

    rsx! {
        nav { class: "navbar",
            Link { class: "navbar__brand", to: Route::Browse {}, "DSCode" }
            span { class: "navbar__stats", "{stats.completed} / {stats.total} solved" }
            ul { class: "navbar__links",
                li { Link { to: Route::Browse {}, "Problems" } }
                li { Link { to: Route::Settings {}, "Settings" } }
            }
            match session {
                Some(session) => rsx! {
                    span { class: "navbar__avatar", title: "{session.email}", "{session.initials()}" }
                },
                None => rsx! {
                    Link { class: "navbar__signin", to: Route::Settings {}, "Sign in" }
                },
            }
        }
    }
}
