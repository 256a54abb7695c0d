//! Auth Page
//!
//! Login and registration. Registering signs the new account straight in.

use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};
use macrofacts::{AuthForm, AuthMode};

use crate::api;
use crate::components::ThemeToggle;
use crate::state::use_global_state;

#[component]
pub fn AuthPage() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (mode, set_mode) = create_signal(AuthMode::Login);
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (loading, set_loading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let form = AuthForm {
            mode: mode.get(),
            username: username.get(),
            password: password.get(),
        };
        let (user, pass) = match form.validate() {
            Ok(credentials) => credentials,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };

        set_error.set(None);
        set_loading.set(true);

        let navigate = navigate.clone();
        spawn_local(async move {
            let result = api::client().authenticate(form.mode, &user, &pass).await;
            set_loading.set(false);
            match result {
                Ok(()) => {
                    state.authenticated.set(true);
                    navigate("/today", NavigateOptions { replace: true, ..Default::default() });
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <div class="authWrap">
            <div class="brand">
                <div class="brandMark" />
                <div class="brandName">"MacroFacts"</div>
                <ThemeToggle class="themeFab" />
            </div>

            <div class="card authCard">
                <div class="authHead">
                    <div class="authTitle">{move || mode.get().title()}</div>
                    <div class="authSub muted">"Privacy-first. Username-only. No email."</div>
                </div>

                {move || error.get().map(|e| view! { <div class="errorText">{e}</div> })}

                <form class="form" on:submit=on_submit>
                    <label class="field">
                        <span class="label">"Username"</span>
                        <input
                            class="input"
                            autocomplete="username"
                            placeholder="KEVIN"
                            prop:value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                        />
                        <div class="hint">"We canonicalize usernames to UPPERCASE."</div>
                    </label>

                    <label class="field">
                        <span class="label">"Password"</span>
                        <input
                            class="input"
                            type="password"
                            autocomplete=move || match mode.get() {
                                AuthMode::Login => "current-password",
                                AuthMode::Register => "new-password",
                            }
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                        <div class="hint">"Minimum 8 characters."</div>
                    </label>

                    <button class="btn" type="submit" disabled=move || loading.get()>
                        {move || if loading.get() { "…" } else { mode.get().submit_label() }}
                    </button>

                    <div class="switchRow">
                        <button
                            class="linkBtn"
                            type="button"
                            on:click=move |_| {
                                set_mode.update(|m| *m = m.toggled());
                                set_error.set(None);
                            }
                        >
                            {move || mode.get().switch_label()}
                        </button>
                    </div>
                </form>
            </div>

            <div class="muted footNote">"No tracking. No email. No ads. Just nutrition."</div>
        </div>
    }
}
