//! Chat Page

use leptos::prelude::*;
use crate::api;
use crate::components::MessageBubble;

/// Greeting every fresh transcript starts with, mirroring the server seed
const GREETING: &str = "Hi there! How can I help you today?";

#[component]
pub fn ChatPage() -> impl IntoView {
    let (messages, set_messages) = signal(vec![api::ChatMessage {
        role: "assistant".into(),
        content: GREETING.into(),
    }]);
    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (api_key, set_api_key) = signal(String::new());
    let (session_id, set_session_id) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);

    let send = move |_| {
        let msg = input.get();
        if msg.trim().is_empty() || loading.get() {
            return;
        }

        // Without a key no request goes out and the transcript stays as-is
        let key = api_key.get();
        if key.trim().is_empty() {
            set_notice.set(Some("Please enter your API key to proceed".into()));
            return;
        }
        set_notice.set(None);

        set_messages.update(|msgs| {
            msgs.push(api::ChatMessage {
                role: "user".into(),
                content: msg.clone(),
            });
        });

        set_input.set(String::new());
        set_loading.set(true);

        let session = session_id.get();
        leptos::task::spawn_local(async move {
            match api::send_chat(&msg, &key, session.as_deref()).await {
                Ok(reply) => {
                    set_session_id.set(Some(reply.session_id));
                    set_messages.update(|msgs| {
                        msgs.push(api::ChatMessage {
                            role: "assistant".into(),
                            content: reply.message,
                        });
                    });
                }
                Err(e) => {
                    set_messages.update(|msgs| {
                        msgs.push(api::ChatMessage {
                            role: "error".into(),
                            content: e,
                        });
                    });
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="chat">
            <aside class="sidebar">
                <h2>"Settings"</h2>
                <div class="field">
                    <label>"Groq API Key"</label>
                    <input
                        type="password"
                        placeholder="gsk_..."
                        prop:value=move || api_key.get()
                        on:input=move |ev| set_api_key.set(event_target_value(&ev))
                    />
                </div>
            </aside>

            <main class="chat-main">
                <Show when=move || notice.get().is_some()>
                    <div class="notice">{move || notice.get().unwrap_or_default()}</div>
                </Show>

                <div class="messages">
                    <For
                        each=move || messages.get()
                        key=|msg| format!("{}-{}", msg.role, msg.content.len())
                        children=move |msg| view! { <MessageBubble message=msg /> }
                    />
                    <Show when=move || loading.get()>
                        <div class="message loading">"..."</div>
                    </Show>
                </div>

                <div class="input-area">
                    <textarea
                        placeholder="Ask anything..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send(());
                            }
                        }
                    />
                    <button on:click=move |_| send(()) disabled=move || loading.get()>
                        {move || if loading.get() { "..." } else { "Send" }}
                    </button>
                </div>
            </main>
        </div>
    }
}
