use dioxus::prelude::*;

use crate::context::{AppContext, UiState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthMode {
    SignIn,
    SignUp,
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let _ = (ui.revision)();
    let breakdown = ctx.services().progress.breakdown();

    rsx! {
        div { class: "page settings-page",
            header { class: "view-header",
                h2 { class: "view-title", "Settings" }
            }

            section { class: "settings-card",
                h3 { "Your Progress" }
                p { class: "settings-card__summary",
                    "{breakdown.global.completed} of {breakdown.global.total} problems solved "
                    "({breakdown.global.percentage}%), {breakdown.global.remaining()} to go."
                }
                ul { class: "topic-stat-list",
                    for slice in breakdown.by_topic {
                        li { class: "topic-stat", key: "{slice.topic}",
                            span { class: "topic-stat__name", "{slice.name}" }
                            div { class: "progress-bar",
                                div {
                                    class: "progress-bar__fill",
                                    style: "width: {slice.stats.percentage}%;",
                                }
                            }
                            span { class: "topic-stat__count",
                                "{slice.stats.completed} / {slice.stats.total}"
                            }
                        }
                    }
                }
            }

            AppearanceSection {}
            AccountSection {}
            DataSection {}
        }
    }
}

#[component]
fn AppearanceSection() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let mut dark_mode = ui.dark_mode;
    rsx! {
        section { class: "settings-card",
            h3 { "Appearance" }
            label { class: "settings-row",
                input {
                    r#type: "checkbox",
                    checked: dark_mode(),
                    onchange: move |evt: Event<FormData>| {
                        let enabled = evt.checked();
                        dark_mode.set(enabled);
                        let ctx = ctx.clone();
                        spawn(async move {
                            ctx.services().prefs.set_dark_mode(enabled).await;
                        });
                    },
                }
                "Dark mode"
            }
        }
    }
}

#[component]
fn AccountSection() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut mode = use_signal(|| AuthMode::SignIn);
    let mut error = use_signal(|| None::<String>);

    let session = ctx.services().auth.current_session();

    if let Some(session) = session {
        let ctx_out = ctx.clone();
        return rsx! {
            section { class: "settings-card",
                h3 { "Account" }
                p { class: "settings-row",
                    span { class: "navbar__avatar", "{session.initials()}" }
                    "Signed in as {session.email}. Progress syncs after every change."
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        let ctx = ctx_out.clone();
                        spawn(async move {
                            ctx.services().auth.sign_out().await;
                            ui.bump();
                        });
                    },
                    "Sign out"
                }
            }
        };
    }

    let ctx_submit = ctx.clone();
    rsx! {
        section { class: "settings-card",
            h3 { "Account" }
            p { class: "settings-card__summary",
                "Sign in to keep your progress in the cloud and pick it up on any device."
            }
            div { class: "auth-tabs",
                button {
                    class: if mode() == AuthMode::SignIn { "btn btn-filter btn-filter--active" } else { "btn btn-filter" },
                    r#type: "button",
                    onclick: move |_| mode.set(AuthMode::SignIn),
                    "Sign in"
                }
                button {
                    class: if mode() == AuthMode::SignUp { "btn btn-filter btn-filter--active" } else { "btn btn-filter" },
                    r#type: "button",
                    onclick: move |_| mode.set(AuthMode::SignUp),
                    "Create account"
                }
            }
            input {
                class: "auth-input",
                r#type: "email",
                placeholder: "Email",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
            }
            input {
                class: "auth-input",
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| {
                    let ctx = ctx_submit.clone();
                    let email_value = email();
                    let password_value = password();
                    let auth_mode = mode();
                    spawn(async move {
                        let result = match auth_mode {
                            AuthMode::SignIn => {
                                ctx.services().auth.sign_in(&email_value, &password_value).await
                            }
                            AuthMode::SignUp => {
                                ctx.services().auth.sign_up(&email_value, &password_value).await
                            }
                        };
                        match result {
                            Ok(_) => {
                                error.set(None);
                                password.set(String::new());
                                ui.bump();
                            }
                            Err(err) => error.set(Some(err.to_string())),
                        }
                    });
                },
                if mode() == AuthMode::SignIn { "Sign in" } else { "Create account" }
            }
        }
    }
}

#[component]
fn DataSection() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_context::<UiState>();

    let mut export_text = use_signal(|| None::<String>);
    let mut import_text = use_signal(String::new);
    let mut status = use_signal(|| None::<String>);
    let mut confirm_reset = use_signal(|| false);

    let ctx_export = ctx.clone();
    let ctx_import = ctx.clone();
    let ctx_reset = ctx.clone();
    rsx! {
        section { class: "settings-card",
            h3 { "Data" }

            div { class: "settings-row",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        export_text.set(Some(ctx_export.services().progress.export_json()));
                    },
                    "Export progress"
                }
            }
            if let Some(json) = export_text() {
                textarea {
                    class: "data-textarea",
                    readonly: true,
                    rows: 8,
                    value: "{json}",
                }
            }

            div { class: "settings-row settings-row--stacked",
                textarea {
                    class: "data-textarea",
                    rows: 8,
                    placeholder: "Paste an exported progress file here",
                    value: "{import_text}",
                    oninput: move |evt| import_text.set(evt.value()),
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        let ctx = ctx_import.clone();
                        let payload = import_text();
                        spawn(async move {
                            match ctx.services().progress.import_json(&payload).await {
                                Ok(()) => {
                                    ctx.services().auth.push_if_signed_in().await;
                                    status.set(Some("Progress imported.".to_string()));
                                    ui.bump();
                                }
                                Err(err) => status.set(Some(err.to_string())),
                            }
                        });
                    },
                    "Import progress"
                }
            }
            if let Some(message) = status() {
                p { class: "form-note", "{message}" }
            }

            div { class: "settings-row",
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| confirm_reset.set(true),
                    "Reset all progress"
                }
            }
            if confirm_reset() {
                div { class: "modal-backdrop",
                    div { class: "modal",
                        p { "This erases every completed problem, locally and in the cloud. There is no undo." }
                        div { class: "modal__actions",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| confirm_reset.set(false),
                                "Keep my progress"
                            }
                            button {
                                class: "btn btn-danger",
                                r#type: "button",
                                onclick: move |_| {
                                    let ctx = ctx_reset.clone();
                                    spawn(async move {
                                        ctx.services().progress.reset().await;
                                        ctx.services().auth.push_if_signed_in().await;
                                        confirm_reset.set(false);
                                        status.set(Some("All progress erased.".to_string()));
                                        ui.bump();
                                    });
                                },
                                "Erase everything"
                            }
                        }
                    }
                }
            }
        }
    }
}
