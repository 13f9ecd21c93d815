use dioxus::prelude::*;
use dioxus_router::Link;

use dscode_core::model::{ProblemId, content_for};

use crate::context::{AppContext, UiState};
use crate::routes::Route;

#[component]
pub fn ProblemView(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let _ = (ui.revision)();
    let problem_id = ProblemId::new(id);
    let catalog = ctx.catalog();
    let Some(problem) = catalog.problem(&problem_id) else {
        return rsx! {
            div { class: "page problem-page",
                p { class: "empty-note", "This problem does not exist." }
                Link { class: "btn btn-secondary", to: Route::Browse {}, "Back to problems" }
            }
        };
    };

    let content = content_for(&problem_id);
    let completed = ctx.services().progress.is_completed(&problem_id);
    let difficulty = problem.difficulty();

    let ctx_toggle = ctx.clone();
    let toggle_id = problem_id.clone();
    rsx! {
        div { class: "page problem-page",
            Link { class: "back-link", to: Route::Browse {}, "← All problems" }
            header { class: "view-header",
                h2 { class: "view-title", "{problem.title()}" }
                span { class: "badge badge--{difficulty}", {difficulty.label()} }
            }
            label { class: "problem-page__toggle",
                input {
                    r#type: "checkbox",
                    checked: completed,
                    onchange: move |evt: Event<FormData>| {
                        let ctx = ctx_toggle.clone();
                        let id = toggle_id.clone();
                        let completed = evt.checked();
                        spawn(async move {
                            ctx.services().progress.toggle_completion(id, completed).await;
                            ctx.services().auth.push_if_signed_in().await;
                            ui.bump();
                        });
                    },
                }
                if completed { "Completed" } else { "Mark as completed" }
            }
            section { class: "content-card",
                h3 { "{content.title}" }
                h4 { "Overview" }
                p { "{content.overview}" }
                h4 { "Key Concepts" }
                p { "{content.key_concepts}" }
                h4 { "Example" }
                pre { class: "content-card__code", code { "{content.code_example}" } }
                h4 { "Resources" }
                ul { class: "content-card__resources",
                    for (name, description) in content.resources.iter().copied() {
                        li { key: "{name}",
                            strong { "{name}" }
                            " — {description}"
                        }
                    }
                }
            }
        }
    }
}
